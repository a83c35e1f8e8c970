use serde::Serialize;

use crate::cli::OutputFormat;

pub mod table;

/// Render a response in the requested format. `text` supplies the
/// human-readable form.
pub fn render<T, F>(value: &T, format: OutputFormat, text: F) -> anyhow::Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Text => Ok(text(value)),
    }
}

/// Print a response in the requested format.
pub fn output<T, F>(value: &T, format: OutputFormat, text: F) -> anyhow::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    let rendered = render(value, format, text)?;
    println!("{rendered}");
    Ok(())
}
