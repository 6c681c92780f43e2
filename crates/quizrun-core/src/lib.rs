//! quizrun-core: the quiz session engine.
//!
//! This crate runs one student's timed attempt at a quiz: question
//! navigation, answer recording, a countdown that force-submits on expiry,
//! per-type grading and assembly of the submission payload. Storage and
//! transport are behind the [`traits::QuestionSource`] and
//! [`traits::SubmissionSink`] traits.

pub mod answers;
pub mod display;
pub mod driver;
pub mod error;
pub mod grader;
pub mod model;
pub mod parser;
pub mod queue;
pub mod session;
pub mod submission;
pub mod timer;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use driver::{run_attempt, AttemptCommand, AttemptObserver, AttemptOutcome, NoopObserver};
pub use error::{SessionError, SinkError};
pub use model::{AnswerValue, Question, QuestionKind, QuizConfig, QuizDefinition};
pub use session::{QuizSession, SessionState, SubmitOutcome, SubmitTrigger};
pub use submission::{ScoreResult, SubmissionPayload};
