//! Quiz API error types.

use quizrun_core::error::SinkError;
use thiserror::Error;

/// Errors that can occur when talking to the quiz API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The API refused the token (HTTP 401/403).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The requested quiz does not exist.
    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    /// A success response whose body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<ApiError> for SinkError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout(secs) => SinkError::Timeout(secs),
            ApiError::Network(msg) => SinkError::Unreachable(msg),
            ApiError::Unauthorized(msg) => SinkError::Unauthorized(msg),
            ApiError::QuizNotFound(id) => SinkError::Rejected {
                status: 404,
                message: format!("quiz not found: {id}"),
            },
            ApiError::Http { status, message } => SinkError::Rejected { status, message },
            ApiError::InvalidResponse(msg) => SinkError::Rejected {
                status: 0,
                message: msg,
            },
        }
    }
}
