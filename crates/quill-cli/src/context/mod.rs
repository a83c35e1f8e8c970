mod app_context;
mod config_warnings;
mod project_root;

pub use app_context::AppContext;
pub use config_warnings::warn_unconfigured;
pub use project_root::{STATE_DIR, find_project_root};
