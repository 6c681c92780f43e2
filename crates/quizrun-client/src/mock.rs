//! Mock source and sink for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizrun_core::error::SinkError;
use quizrun_core::model::QuizDefinition;
use quizrun_core::submission::SubmissionPayload;
use quizrun_core::traits::{QuestionSource, SubmissionAck, SubmissionSink};

/// A sink that records payloads instead of sending them.
pub struct MockSink {
    /// Error returned from every call, if set.
    failure: Option<SinkError>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last payload received.
    last_payload: Mutex<Option<SubmissionPayload>>,
}

impl MockSink {
    /// A sink that acknowledges every submission.
    pub fn new() -> Self {
        Self {
            failure: None,
            call_count: AtomicU32::new(0),
            last_payload: Mutex::new(None),
        }
    }

    /// A sink that fails every submission with `error`.
    pub fn failing(error: SinkError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// Get the number of calls made to this sink.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last payload submitted to this sink.
    pub fn last_payload(&self) -> Option<SubmissionPayload> {
        self.last_payload
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionSink for MockSink {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(&self, payload: &SubmissionPayload) -> anyhow::Result<SubmissionAck> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_payload
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(payload.clone());

        match &self.failure {
            Some(error) => Err(error.clone().into()),
            None => Ok(SubmissionAck::with_receipt(format!(
                "mock-{}",
                payload.submission_id
            ))),
        }
    }
}

/// A source serving one in-memory quiz.
pub struct MockSource {
    quiz: QuizDefinition,
    start_count: AtomicU32,
}

impl MockSource {
    pub fn new(quiz: QuizDefinition) -> Self {
        Self {
            quiz,
            start_count: AtomicU32::new(0),
        }
    }

    /// Get the number of recorded attempt starts.
    pub fn start_count(&self) -> u32 {
        self.start_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl QuestionSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_quiz(&self, quiz_id: &str) -> anyhow::Result<QuizDefinition> {
        if quiz_id != self.quiz.config.quiz_id {
            anyhow::bail!("quiz not found: {quiz_id}");
        }
        Ok(self.quiz.clone())
    }

    async fn start_attempt(&self, _quiz_id: &str, _student_id: Option<&str>) -> anyhow::Result<()> {
        self.start_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
