use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::ui;

const TICK: Duration = Duration::from_millis(100);

/// Stderr spinner shown while a turn or refresh pass runs. Inert when
/// spinners are disabled, so callers never branch on terminal state.
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        let bar = ui::prefs().spinners.then(|| {
            let style = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
                .with_style(style)
                .with_message(message.to_string());
            bar.enable_steady_tick(TICK);
            bar
        });
        Self { bar }
    }

    /// Remove the spinner line entirely.
    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Stop the spinner, leaving `message` on its line.
    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}
