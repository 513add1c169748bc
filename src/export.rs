//! Diagnostic export of normalized records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::NormalizeError;
use crate::models::AnimeRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("TOML serialization failed: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML parsing failed: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML record is invalid: {0}")]
    Normalize(#[from] NormalizeError),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Toml,
    Json,
    Xml,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

/// Renders `record` as human-readable text in `format`.
///
/// TOML and JSON use the model's field names; XML goes back to the feed's
/// own element layout.
pub fn render(record: &AnimeRecord, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Toml => Ok(toml::to_string_pretty(record)?),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        ExportFormat::Xml => Ok(record.to_xml()?),
    }
}

/// Reads back text produced by [`render`].
pub fn parse(text: &str, format: ExportFormat) -> Result<AnimeRecord, ExportError> {
    match format {
        ExportFormat::Toml => Ok(toml::from_str(text)?),
        ExportFormat::Json => Ok(serde_json::from_str(text)?),
        ExportFormat::Xml => Ok(AnimeRecord::from_xml(text)?),
    }
}
