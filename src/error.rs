//! Error types for the flatgene library.

use thiserror::Error;

/// Errors that can occur while reading or consolidating a record.
///
/// Domain-level problems found during consolidation (inconsistent locus tags,
/// strand splits, ...) are not errors: they are reported as diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The input or output JSON could not be (de)serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A value could not be parsed.
    #[error("{0}")]
    Parse(String),

    /// The input record violates a structural constraint.
    #[error("{0}")]
    Validation(String),
}
