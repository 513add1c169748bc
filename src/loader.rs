//! Batch loading of feed documents from disk.
//!
//! Records do not share any state while being normalized, so every file is
//! parsed on its own blocking task and the batch is joined at the end. Any
//! failing file fails the batch; the caller decides what to do with it.

use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::models::AnimeRecord;

/// Reads and normalizes one document.
#[instrument(skip(path), fields(path = %path.display()))]
pub async fn load_record(path: &Path) -> Result<AnimeRecord> {
    let xml = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let record = tokio::task::spawn_blocking(move || AnimeRecord::from_xml(&xml))
        .await
        .context("Normalization task panicked")?
        .with_context(|| format!("Failed to normalize {}", path.display()))?;

    debug!(anime_id = %record.id, "Loaded record");
    Ok(record)
}

/// Loads every path concurrently, keeping the input order in the result.
#[instrument(skip(paths), fields(count = paths.len()))]
pub async fn load_records(paths: &[PathBuf]) -> Result<Vec<AnimeRecord>> {
    let start = std::time::Instant::now();
    let records = try_join_all(paths.iter().map(|path| load_record(path))).await?;

    info!(
        records = records.len(),
        duration_ms = start.elapsed().as_millis(),
        "Loaded record batch"
    );
    Ok(records)
}
