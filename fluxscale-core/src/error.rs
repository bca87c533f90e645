//! Error Taxonomy
//!
//! One error type flows through the store, the sources and the metrics engine.
//! [`ScaleError::kind`] folds the variants back onto the four categories a
//! report generator cares about: structural problems are fatal at load time,
//! missing data is recoverable per query.

use crate::label::ConfigLabel;
use thiserror::Error;

/// Broad category of a [`ScaleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Dataset violates a structural invariant (missing baseline, bad time)
    Validation,
    /// A configuration label cannot be decomposed into policy and chunk
    Schema,
    /// A query referenced a size or measurement absent from the store
    NotFound,
    /// Caller supplied a structurally invalid parameter
    InvalidArgument,
    /// Input could not be read or decoded
    Source,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Schema => write!(f, "schema"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::InvalidArgument => write!(f, "invalid argument"),
            ErrorKind::Source => write!(f, "source"),
        }
    }
}

/// Errors from loading and querying benchmark results
#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("size {size} has no sequential baseline at 1 thread")]
    MissingBaseline { size: u64 },

    #[error("sequential baseline for size {size} recorded at {threads} threads, expected 1")]
    MisplacedBaseline { size: u64, threads: u32 },

    #[error(
        "time {time} for size {size}, {threads} threads, {config} must be finite and strictly positive"
    )]
    InvalidTime {
        size: u64,
        threads: u32,
        config: ConfigLabel,
        time: f64,
    },

    #[error("duplicate measurement for size {size}, {threads} threads, {config}")]
    DuplicateMeasurement {
        size: u64,
        threads: u32,
        config: ConfigLabel,
    },

    #[error("{field} must be a positive integer")]
    ZeroDimension { field: &'static str },

    #[error("invalid configuration label '{label}': {reason}")]
    Schema { label: String, reason: String },

    #[error("size {size} not found")]
    SizeNotFound { size: u64 },

    #[error("no measurement for size {size}, {threads} threads, {config}")]
    MeasurementNotFound {
        size: u64,
        threads: u32,
        config: ConfigLabel,
    },

    #[error("no parallel configuration recorded for size {size} at {threads} threads")]
    NoParallelConfig { size: u64, threads: u32 },

    #[error("no parallel run recorded for size {size}")]
    NoParallelRuns { size: u64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScaleError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScaleError::MissingBaseline { .. }
            | ScaleError::MisplacedBaseline { .. }
            | ScaleError::InvalidTime { .. }
            | ScaleError::DuplicateMeasurement { .. }
            | ScaleError::ZeroDimension { .. } => ErrorKind::Validation,
            ScaleError::Schema { .. } => ErrorKind::Schema,
            ScaleError::SizeNotFound { .. }
            | ScaleError::MeasurementNotFound { .. }
            | ScaleError::NoParallelConfig { .. }
            | ScaleError::NoParallelRuns { .. } => ErrorKind::NotFound,
            ScaleError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ScaleError::Io(_) | ScaleError::Csv(_) | ScaleError::Json(_) => ErrorKind::Source,
        }
    }

    /// Whether a report can skip the affected data point and carry on
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }

    pub(crate) fn schema(label: impl Into<String>, reason: impl Into<String>) -> Self {
        ScaleError::Schema {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            ScaleError::MissingBaseline { size: 1 }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(ScaleError::schema("x", "bad").kind(), ErrorKind::Schema);
        assert_eq!(
            ScaleError::SizeNotFound { size: 1 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ScaleError::InvalidArgument("threads".into()).kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn test_only_not_found_is_recoverable() {
        assert!(
            ScaleError::NoParallelConfig {
                size: 512,
                threads: 8
            }
            .is_recoverable()
        );
        assert!(ScaleError::NoParallelRuns { size: 512 }.is_recoverable());
        assert!(!ScaleError::MissingBaseline { size: 512 }.is_recoverable());
    }
}
