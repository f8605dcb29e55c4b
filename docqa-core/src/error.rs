//! Error types for the `docqa-core` crate.

use thiserror::Error;

/// Errors that can occur in pipeline operations.
#[derive(Debug, Error)]
pub enum QaError {
    /// Malformed caller input. The operation was not attempted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An error occurred in the embedding index backend.
    #[error("Index error ({backend}): {message}")]
    Index {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the span-scoring model.
    #[error("Scorer error ({model}): {message}")]
    Scorer {
        /// The scoring model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, QaError>;

/// A collaborator failure converted into a displayable outcome.
///
/// Public orchestrator operations return `Result<_, SoftError>` instead
/// of letting collaborator errors cross the boundary. The boundary layer
/// is responsible for rendering the message to the end user as a normal
/// response; it must not treat a `SoftError` as a hard failure.
#[derive(Debug, Clone, Error)]
#[error("{operation}: {message}")]
pub struct SoftError {
    /// The public operation that degraded.
    pub operation: &'static str,
    /// A human-readable message safe to show to the caller.
    pub message: String,
}

impl SoftError {
    /// Create a new soft error for the named operation.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self { operation, message: message.into() }
    }
}
