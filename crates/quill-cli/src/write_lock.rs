//! Cross-process write lock for a project's workspace store.
//!
//! In-process turns are serialized per workspace by the engine. Separate
//! `quill` processes (a `chat` racing a cron-driven `refresh`) are serialized
//! by this lock file, created with `create_new` and holding the owner's pid.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::bail;

use crate::context::STATE_DIR;

const LOCK_FILE: &str = "store.write.lock";
const WAIT_LIMIT: Duration = Duration::from_secs(300);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Removes the lock file when dropped.
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), %error, "failed to remove store write lock");
        }
    }
}

/// Why the lock could not be taken right now.
#[derive(Debug, PartialEq, Eq)]
enum Contention {
    /// A running process owns it.
    Held(u32),
    /// The recorded owner is gone.
    Abandoned,
    /// The lock file exists but its owner cannot be determined.
    Unreadable,
}

/// Take the project's store write lock, waiting up to five minutes for a
/// running holder. Abandoned locks are removed and retaken.
pub async fn acquire_for_project(project_root: &Path) -> anyhow::Result<WriteLockGuard> {
    let path = project_root.join(STATE_DIR).join(LOCK_FILE);
    let deadline = Instant::now() + WAIT_LIMIT;

    loop {
        let contention = match try_acquire(&path) {
            Ok(guard) => return Ok(guard),
            Err(contention) => contention,
        };
        match contention {
            Contention::Abandoned => {
                tracing::warn!(path = %path.display(), "removing abandoned store write lock");
                let _ = std::fs::remove_file(&path);
                continue;
            }
            Contention::Held(pid) if Instant::now() >= deadline => {
                bail!("another quill process (pid {pid}) is still writing to this project");
            }
            Contention::Unreadable if Instant::now() >= deadline => {
                bail!(
                    "cannot determine the owner of {}; delete it if no quill process is running",
                    path.display()
                );
            }
            Contention::Held(pid) => tracing::debug!(pid, "waiting for store write lock"),
            Contention::Unreadable => tracing::debug!("waiting for unreadable store write lock"),
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn try_acquire(path: &Path) -> Result<WriteLockGuard, Contention> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(WriteLockGuard {
                path: path.to_path_buf(),
            })
        }
        Err(error) if error.kind() == std::io::ErrorKind::AlreadyExists => Err(inspect(path)),
        Err(_) => Err(Contention::Unreadable),
    }
}

fn inspect(path: &Path) -> Contention {
    let Some(pid) = std::fs::read_to_string(path)
        .ok()
        .and_then(|text| text.trim().parse::<u32>().ok())
    else {
        return Contention::Unreadable;
    };
    if process_alive(pid) {
        Contention::Held(pid)
    } else {
        Contention::Abandoned
    }
}

/// `kill -0` probes for a process without signalling it.
fn process_alive(pid: u32) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}
