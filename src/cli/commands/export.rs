//! Export command handler

use std::path::{Path, PathBuf};
use tracing::info;

use super::write_output;
use crate::config::Config;
use crate::export::{ExportFormat, render};
use crate::loader::load_record;

pub async fn cmd_export(
    config: &Config,
    path: &Path,
    format: Option<ExportFormat>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let format = format.unwrap_or(config.export.format);
    let record = load_record(path).await?;
    let content = render(&record, format)?;

    let output = output
        .unwrap_or_else(|| config.export.default_output(&record.id.to_string(), format));
    write_output(&output, &content).await?;

    info!(anime_id = %record.id, output = %output.display(), "Exported record");
    println!("✓ Exported {} to {}", record.id, output.display());
    Ok(())
}
