use std::path::{Path, PathBuf};

/// Per-project state directory holding the store, config, and write lock.
pub const STATE_DIR: &str = ".quill";

/// Nearest ancestor of `start` (inclusive) that contains a `.quill` directory.
#[must_use]
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(STATE_DIR).is_dir())
        .map(Path::to_path_buf)
}
