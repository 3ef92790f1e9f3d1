//! Error types for node execution.

use thiserror::Error;

/// Result type for node operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type for node construction and execution.
#[derive(Debug, Error)]
pub enum Error {
    /// Parameters do not describe a valid operation.
    #[error("{0}")]
    InvalidParameters(String),

    /// Item lacks the binary data the operation needs.
    #[error("{0}")]
    MissingBinary(String),

    /// API call failed.
    #[error(transparent)]
    Client(#[from] vlmrun_client::Error),

    /// Output could not be converted to JSON.
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Processing of one item failed and continue-on-fail is off.
    #[error("Item {index} failed: {source}")]
    Item {
        /// Position of the item in the input batch.
        index: usize,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates an invalid parameters error.
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::InvalidParameters(message.into())
    }

    /// Wraps an item failure with its index.
    pub fn item(index: usize, source: Error) -> Self {
        Self::Item {
            index,
            source: Box::new(source),
        }
    }

    /// Returns true if the error was raised before any request was made.
    pub fn is_validation(&self) -> bool {
        match self {
            Error::InvalidParameters(_) | Error::MissingBinary(_) => true,
            Error::Client(err) => err.is_validation(),
            Error::Item { source, .. } => source.is_validation(),
            Error::Serialization(_) => false,
        }
    }

    /// Returns the message emitted as `{"error": ...}` under continue-on-fail.
    pub fn item_message(&self) -> String {
        match self {
            Error::Item { source, .. } => source.item_message(),
            other => other.to_string(),
        }
    }
}
