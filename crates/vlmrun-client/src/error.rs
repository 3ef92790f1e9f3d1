//! Error types for VLM Run API operations.

use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for all operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors surfaced by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The API answered with a structured error detail.
    Api,
    /// The request never produced a usable answer.
    Transport,
    /// Input was rejected before any request was made.
    Validation,
    /// The poll ceiling was reached without a completed prediction.
    Timeout,
    /// The API reported the prediction as failed.
    JobFailed,
}

/// Error type for VLM Run API operations.
///
/// The display form of every variant is the message surfaced to users, so
/// [`Error::Api`] renders the server-supplied detail verbatim.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response carrying a `detail` field.
    #[error("{detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Detail string supplied by the API.
        detail: String,
    },

    /// Network failure, unstructured error response or undecodable body.
    #[error("{message}")]
    Transport {
        /// Prefixed, human-readable message.
        message: String,
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Underlying cause.
        #[source]
        source: Option<BoxedError>,
    },

    /// Missing or malformed input.
    #[error("{message}")]
    Validation {
        /// Description of what is invalid.
        message: String,
    },

    /// Poll ceiling reached.
    #[error("Response processing timed out after {attempts} attempts")]
    Timeout {
        /// Identifier of the prediction being polled.
        response_id: String,
        /// Number of status checks performed.
        attempts: u32,
    },

    /// Prediction ended in the `failed` state.
    #[error("Prediction {response_id} failed")]
    JobFailed {
        /// Identifier of the failed prediction.
        response_id: String,
    },
}

impl Error {
    /// Creates an API error from a server-supplied detail.
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    /// Creates a transport error prefixed with the failing call's context.
    pub fn transport(
        context: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: format!("{context}: {source}"),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Creates a transport error for a non-2xx response without detail.
    pub fn http_status(context: &str, status: u16) -> Self {
        Self::Transport {
            message: format!("{context}: Request failed with status code {status}"),
            status: Some(status),
            source: None,
        }
    }

    /// Creates a transport error for a 2xx response missing expected content.
    pub fn invalid_response(reason: &str) -> Self {
        Self::Transport {
            message: format!("Invalid API response: {reason}"),
            status: None,
            source: None,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a poll timeout error.
    pub fn timeout(response_id: impl Into<String>, attempts: u32) -> Self {
        Self::Timeout {
            response_id: response_id.into(),
            attempts,
        }
    }

    /// Creates a failed prediction error.
    pub fn job_failed(response_id: impl Into<String>) -> Self {
        Self::JobFailed {
            response_id: response_id.into(),
        }
    }

    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Api { .. } => ErrorKind::Api,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::JobFailed { .. } => ErrorKind::JobFailed,
        }
    }

    /// Get the error category for metrics/logging.
    pub fn category(&self) -> &'static str {
        self.kind().into()
    }

    /// Get the HTTP status code if a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if the input was rejected before any request was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns true if the poll ceiling was reached.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
