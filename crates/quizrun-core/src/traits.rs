//! Boundary traits for the collaborators the engine consumes.
//!
//! The engine never owns storage: questions come from a [`QuestionSource`]
//! and finished attempts go to a [`SubmissionSink`]. Implementations live in
//! the `quizrun-client` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::QuizDefinition;
use crate::submission::SubmissionPayload;

// ---------------------------------------------------------------------------
// Question source
// ---------------------------------------------------------------------------

/// Where quizzes are fetched from before an attempt starts.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch a quiz's configuration and ordered question list.
    async fn fetch_quiz(&self, quiz_id: &str) -> anyhow::Result<QuizDefinition>;

    /// Record that a student started the quiz. Sources without attempt
    /// tracking accept and ignore it.
    async fn start_attempt(&self, quiz_id: &str, student_id: Option<&str>) -> anyhow::Result<()> {
        let _ = (quiz_id, student_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Submission sink
// ---------------------------------------------------------------------------

/// The service that durably records a finished attempt.
///
/// Failures should be returned as [`SinkError`](crate::error::SinkError)
/// (wrapped in `anyhow`) so the engine can tell retryable failures apart.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Human-readable sink name (e.g. "http", "directory").
    fn name(&self) -> &str;

    /// Deliver one assembled payload.
    async fn submit(&self, payload: &SubmissionPayload) -> anyhow::Result<SubmissionAck>;
}

/// Acknowledgement returned by a sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAck {
    /// Service-assigned receipt (record id, file path, ...), if any.
    #[serde(default)]
    pub receipt: Option<String>,
}

impl SubmissionAck {
    pub fn with_receipt(receipt: impl Into<String>) -> Self {
        Self {
            receipt: Some(receipt.into()),
        }
    }
}
