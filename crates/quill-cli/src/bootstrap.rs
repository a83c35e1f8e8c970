use std::path::Path;

use anyhow::Context;
use quill_config::QuillConfig;

/// Load `.env` from the project root, then the layered config.
///
/// Relative config paths (`.quill/config.toml`) are resolved against the
/// current directory, which `main` has already set to the project root.
pub fn load_config(project_root: &Path) -> anyhow::Result<QuillConfig> {
    load_project_dotenv(project_root)?;
    QuillConfig::load().context("failed to load quill configuration")
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}
