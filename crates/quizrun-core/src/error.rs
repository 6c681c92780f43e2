//! Engine error types.
//!
//! `SessionError` covers operations refused by the attempt state machine.
//! `SinkError` classifies submission failures so the engine can decide
//! whether a payload is worth queueing for a later retry.

use thiserror::Error;

use crate::session::SessionState;

/// Errors returned by [`QuizSession`](crate::session::QuizSession) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The operation is only permitted in a different state.
    #[error("cannot {operation} while the session is {state}")]
    WrongState {
        operation: &'static str,
        state: SessionState,
    },

    /// An answer was recorded for a question that is not part of this quiz.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// There is no question at the current position (empty question set).
    #[error("quiz has no questions")]
    NoQuestions,
}

/// Errors a submission sink can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The submission service could not be reached.
    #[error("submission service unreachable: {0}")]
    Unreachable(String),

    /// The request timed out.
    #[error("submission timed out after {0}s")]
    Timeout(u64),

    /// The service refused the credentials.
    #[error("submission unauthorized: {0}")]
    Unauthorized(String),

    /// The service answered with an error status.
    #[error("submission rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

impl SinkError {
    /// Returns `true` if sending the same payload again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SinkError::Unreachable(_) | SinkError::Timeout(_) => true,
            SinkError::Unauthorized(_) => false,
            SinkError::Rejected { status, .. } => *status >= 500 || *status == 429,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(SinkError::Unreachable("connection refused".into()).is_retryable());
        assert!(SinkError::Timeout(30).is_retryable());
        assert!(SinkError::Rejected {
            status: 503,
            message: "maintenance".into()
        }
        .is_retryable());
        assert!(!SinkError::Rejected {
            status: 422,
            message: "bad payload".into()
        }
        .is_retryable());
        assert!(!SinkError::Unauthorized("expired token".into()).is_retryable());
    }

    #[test]
    fn wrong_state_message() {
        let err = SessionError::WrongState {
            operation: "record an answer",
            state: SessionState::Submitted,
        };
        assert_eq!(
            err.to_string(),
            "cannot record an answer while the session is submitted"
        );
    }
}
