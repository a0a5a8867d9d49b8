//! Failure type shared by every pipeline
//!
//! A pipeline either produces its full result or a [`PipelineError`]. There is
//! no partial result. Rows that fail their per-row predicate are not errors;
//! they are reported as [`crate::schema::Rejection`] values by the row filters.

use crate::schema::Violation;

/// The two failure kinds a caller can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Top-level shape violation, or no row survived filtering
    MalformedContainer,
    /// A single record failed its predicate; carried by rejections, never returned as an error
    InvalidRow,
}

/// Reason a pipeline produced no result
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("malformed {container}: {violation}")]
    Malformed {
        container: &'static str,
        violation: Violation,
    },

    #[error("no valid rows remain in {container} after filtering")]
    NoValidRows { container: &'static str },

    #[error("invalid JSON input: {0}")]
    InvalidJson(String),
}

impl PipelineError {
    pub fn malformed(container: &'static str, violation: Violation) -> Self {
        PipelineError::Malformed {
            container,
            violation,
        }
    }

    /// Every pipeline failure is reported as a malformed container
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedContainer
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::InvalidJson(err.to_string())
    }
}

/// Result alias used by the pipelines
pub type Outcome<T> = Result<T, PipelineError>;

/// Parse a JSON document, converting syntax errors into [`PipelineError::InvalidJson`]
pub fn parse_document(input: &str) -> Outcome<serde_json::Value> {
    Ok(serde_json::from_str(input)?)
}
