use thiserror::Error;

use crate::xml::XmlError;

/// Errors raised while turning an [`AttributeNode`](crate::node::AttributeNode)
/// tree into typed records.
///
/// Any of these aborts normalization of the whole containing record.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("Missing required field '{field}' on {entity}")]
    MissingField { entity: &'static str, field: String },

    #[error("Field '{field}' on {entity} should be {expected}")]
    ShapeMismatch {
        entity: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("Invalid value for '{field}' on {entity}: {value:?}")]
    InvalidValue {
        entity: &'static str,
        field: String,
        value: String,
    },

    #[error("Unexpected root element: {0}")]
    UnexpectedRoot(String),

    #[error("Source replied with an error: {0}")]
    SourceError(String),

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),
}

impl NormalizeError {
    /// Returns true for the "key absent" condition, which is what the
    /// rating shape chain falls through on.
    #[must_use]
    pub const fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
