//! Error types for schema definition and record validation.
//!
//! Two classes of failure are kept apart. Definition errors
//! ([`Error::InvalidSchemaDefinition`], [`Error::InvalidArgument`]) are caller
//! mistakes and are reported as soon as they are detected. Data findings are
//! collected as [`Violation`]s and only become an [`Error::ValidationFailed`]
//! when the caller asks validation to raise.

use crate::schema::Violation;

/// Main error type for schema construction and validation calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A rule or schema description is malformed. Carries every violation found.
    #[error("Invalid schema definition: {}", summarize(.violations))]
    InvalidSchemaDefinition { violations: Vec<Violation> },

    /// An argument was absent, empty, or of the wrong shape.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A record or value does not satisfy its schema.
    #[error("Validation failed: {}", summarize(.violations))]
    ValidationFailed { violations: Vec<Violation> },
}

impl Error {
    /// Create an invalid schema definition error
    pub fn invalid_definition(violations: Vec<Violation>) -> Self {
        Self::InvalidSchemaDefinition { violations }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a validation failure carrying the full violation list
    pub fn validation_failed(violations: Vec<Violation>) -> Self {
        Self::ValidationFailed { violations }
    }

    /// The violations carried by this error, empty for argument errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvalidSchemaDefinition { violations }
            | Self::ValidationFailed { violations } => violations,
            Self::InvalidArgument { .. } => &[],
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
