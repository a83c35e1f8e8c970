use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

/// Terminal presentation settings, fixed once at startup.
#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    /// Draw spinners on stderr.
    pub spinners: bool,
    /// Width available for text tables, from `COLUMNS`.
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

/// Spinners only make sense for a person watching a terminal: stderr is a
/// TTY, output is human-readable text, and `--quiet` is off.
const fn spinners_enabled(stderr_is_tty: bool, flags: &GlobalFlags) -> bool {
    stderr_is_tty && !flags.quiet && matches!(flags.format, OutputFormat::Text)
}

fn parse_columns(value: Option<String>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|width| *width >= 40)
}

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(UiPrefs {
        spinners: spinners_enabled(std::io::stderr().is_terminal(), flags),
        term_width: parse_columns(std::env::var("COLUMNS").ok()),
    });
}

#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}
