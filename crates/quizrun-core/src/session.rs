//! The attempt state machine.
//!
//! A [`QuizSession`] owns one student's attempt: the question list, the
//! cursor, the answer store and the countdown. It moves through
//!
//! ```text
//! Loading -> InProgress -> Submitting -> Submitted
//!    |           |
//!    |           +--> Abandoned
//!    +--> Unavailable / Abandoned
//! ```
//!
//! Submission is claimed once per session. A second `submit` (a manual
//! submit racing with expiry, or a repeated click) returns
//! [`SubmitOutcome::AlreadySubmitted`] without grading or calling the sink.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerStore;
use crate::error::{SessionError, SinkError};
use crate::model::{AnswerValue, Question, QuestionId, QuizConfig};
use crate::queue::PendingQueue;
use crate::submission::{assemble, compute_score, AttemptSnapshot, ScoreResult, SubmissionPayload};
use crate::timer::{CountdownTimer, TickOutcome};
use crate::traits::{QuestionSource, SubmissionAck, SubmissionSink};

/// Lifecycle state of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Loading,
    InProgress,
    Submitting,
    Submitted,
    /// The question set could not be loaded or was empty.
    Unavailable,
    /// The student left before submitting.
    Abandoned,
}

impl SessionState {
    /// No further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Submitted | SessionState::Unavailable | SessionState::Abandoned
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Loading => "loading",
            SessionState::InProgress => "in progress",
            SessionState::Submitting => "submitting",
            SessionState::Submitted => "submitted",
            SessionState::Unavailable => "unavailable",
            SessionState::Abandoned => "abandoned",
        };
        write!(f, "{s}")
    }
}

/// What started a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitTrigger {
    /// The student asked to submit; unanswered questions need confirmation.
    Manual,
    /// The countdown ran out; no confirmation is asked.
    Expired,
}

/// Per-question status for a navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavStatus {
    Current,
    Answered,
    Unanswered,
}

/// Asks the student whether to submit with unanswered questions.
#[async_trait]
pub trait ConfirmSubmit: Send {
    async fn confirm_unanswered(&mut self, unanswered: usize) -> bool;
}

/// Fixed answer to every confirmation request.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl ConfirmSubmit for AutoConfirm {
    async fn confirm_unanswered(&mut self, _unanswered: usize) -> bool {
        self.0
    }
}

/// How the payload reached (or failed to reach) the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Acknowledged(SubmissionAck),
    /// The sink failed with a retryable error; the payload is in the pending queue.
    Queued { warning: String },
    /// The sink failed and the payload was not queued.
    Failed { warning: String },
}

impl Delivery {
    pub fn warning(&self) -> Option<&str> {
        match self {
            Delivery::Acknowledged(_) => None,
            Delivery::Queued { warning } | Delivery::Failed { warning } => Some(warning),
        }
    }
}

/// The locally finalized result of a submitted attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    pub payload: SubmissionPayload,
    pub trigger: SubmitTrigger,
    pub delivery: Delivery,
}

impl SubmissionReport {
    pub fn score(&self) -> &ScoreResult {
        &self.payload.score
    }

    /// Non-fatal sink warning, if delivery did not succeed.
    pub fn warning(&self) -> Option<&str> {
        self.delivery.warning()
    }
}

/// Result of a [`QuizSession::submit`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The student declined to submit with unanswered questions.
    Declined { unanswered: usize },
    /// A submission was already claimed for this session.
    AlreadySubmitted,
    Submitted(SubmissionReport),
}

/// One student's timed attempt at one quiz.
#[derive(Debug)]
pub struct QuizSession {
    config: QuizConfig,
    student_id: Option<String>,
    questions: Vec<Question>,
    state: SessionState,
    cursor: usize,
    answers: AnswerStore,
    timer: CountdownTimer,
    submission_claimed: bool,
    report: Option<SubmissionReport>,
    unavailable_reason: Option<String>,
    pending: Option<PendingQueue>,
}

impl QuizSession {
    /// A session in `Loading` for the quiz named by `config`.
    pub fn new(config: QuizConfig) -> Self {
        let timer = CountdownTimer::new(config.time_limit_secs);
        Self {
            config,
            student_id: None,
            questions: Vec::new(),
            state: SessionState::Loading,
            cursor: 0,
            answers: AnswerStore::new(),
            timer,
            submission_claimed: false,
            report: None,
            unavailable_reason: None,
            pending: None,
        }
    }

    pub fn with_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    /// Queue retryable sink failures here instead of only warning.
    pub fn with_pending_queue(mut self, queue: PendingQueue) -> Self {
        self.pending = Some(queue);
        self
    }

    /// Fetch the quiz from `source` and start the attempt.
    ///
    /// A failed fetch or an empty question set leaves the session
    /// `Unavailable`; it is not an error.
    pub async fn load(&mut self, source: &dyn QuestionSource) -> Result<(), SessionError> {
        self.require(SessionState::Loading, "load questions")?;
        let quiz_id = self.config.quiz_id.clone();
        tracing::debug!(quiz = %quiz_id, source = source.name(), "fetching quiz");

        let definition = match source.fetch_quiz(&quiz_id).await {
            Ok(definition) => definition,
            Err(e) => {
                self.fail_loading(format!("could not load quiz {quiz_id}: {e:#}"))?;
                return Ok(());
            }
        };

        self.config = definition.config;
        self.load_questions(definition.questions)?;

        if self.state == SessionState::InProgress {
            if let Err(e) = source
                .start_attempt(&self.config.quiz_id, self.student_id.as_deref())
                .await
            {
                tracing::warn!(quiz = %self.config.quiz_id, error = %e, "failed to record attempt start");
            }
        }
        Ok(())
    }

    /// Install the question set. Empty means `Unavailable`.
    pub fn load_questions(&mut self, questions: Vec<Question>) -> Result<(), SessionError> {
        self.require(SessionState::Loading, "load questions")?;
        if questions.is_empty() {
            return self.fail_loading(format!("quiz {} has no questions", self.config.quiz_id));
        }

        self.questions = questions;
        self.cursor = 0;
        self.timer = CountdownTimer::new(self.config.time_limit_secs);
        self.state = SessionState::InProgress;
        tracing::info!(
            quiz = %self.config.quiz_id,
            questions = self.questions.len(),
            time_limit = self.config.time_limit_secs,
            "attempt started"
        );
        Ok(())
    }

    /// Mark the quiz as unavailable with a user-facing reason.
    pub fn fail_loading(&mut self, reason: impl Into<String>) -> Result<(), SessionError> {
        self.require(SessionState::Loading, "fail loading")?;
        let reason = reason.into();
        tracing::warn!(quiz = %self.config.quiz_id, %reason, "quiz unavailable");
        self.timer.stop();
        self.unavailable_reason = Some(reason);
        self.state = SessionState::Unavailable;
        Ok(())
    }

    // -- navigation ---------------------------------------------------------

    /// Move to the next question (stays on the last one).
    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.jump_to(self.cursor.saturating_add(1))
    }

    /// Move to the previous question (stays on the first one).
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.jump_to(self.cursor.saturating_sub(1))
    }

    /// Move to `index`, clamped to the question range.
    pub fn jump_to(&mut self, index: usize) -> Result<usize, SessionError> {
        self.require(SessionState::InProgress, "navigate")?;
        let last = self.questions.len().saturating_sub(1);
        self.cursor = index.min(last);
        tracing::debug!(cursor = self.cursor, "navigated");
        Ok(self.cursor)
    }

    // -- answers ------------------------------------------------------------

    /// Record an answer for a question of this quiz.
    pub fn record_answer(&mut self, question_id: &str, value: AnswerValue) -> Result<(), SessionError> {
        self.require(SessionState::InProgress, "record an answer")?;
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(SessionError::UnknownQuestion(question_id.to_string()));
        }
        tracing::debug!(question = question_id, answer = %value, "answer recorded");
        self.answers.record(question_id, value);
        Ok(())
    }

    /// Record an answer for the question under the cursor.
    pub fn record_current(&mut self, value: AnswerValue) -> Result<QuestionId, SessionError> {
        self.require(SessionState::InProgress, "record an answer")?;
        let id = self
            .current_question()
            .map(|q| q.id.clone())
            .ok_or(SessionError::NoQuestions)?;
        self.record_answer(&id, value)?;
        Ok(id)
    }

    // -- timer --------------------------------------------------------------

    /// Advance the countdown by one second. Ticks outside `InProgress` are
    /// ignored.
    pub fn on_tick(&mut self) -> TickOutcome {
        if self.state != SessionState::InProgress {
            return TickOutcome::Idle;
        }
        self.timer.tick()
    }

    /// `true` once if the countdown is already at zero, without a tick.
    pub fn take_expiry(&mut self) -> bool {
        self.state == SessionState::InProgress && self.timer.take_expiry()
    }

    // -- submission ---------------------------------------------------------

    /// Grade, assemble and deliver the attempt.
    ///
    /// A manual submit with unanswered questions asks `confirm` first. Sink
    /// failures never fail the call: the session still ends `Submitted` and
    /// the failure is reported in [`SubmissionReport::delivery`].
    pub async fn submit(
        &mut self,
        trigger: SubmitTrigger,
        confirm: &mut dyn ConfirmSubmit,
        sink: &dyn SubmissionSink,
    ) -> Result<SubmitOutcome, SessionError> {
        if self.submission_claimed {
            tracing::warn!(?trigger, "submission already claimed, ignoring");
            return Ok(SubmitOutcome::AlreadySubmitted);
        }
        self.require(SessionState::InProgress, "submit")?;

        if trigger == SubmitTrigger::Manual {
            let unanswered = self.unanswered_count();
            if unanswered > 0 && !confirm.confirm_unanswered(unanswered).await {
                tracing::info!(unanswered, "submission declined");
                return Ok(SubmitOutcome::Declined { unanswered });
            }
        }

        self.submission_claimed = true;
        self.state = SessionState::Submitting;
        self.timer.stop();

        let payload = assemble(self.snapshot(), Utc::now());
        tracing::info!(
            quiz = %payload.quiz_id,
            submission = %payload.submission_id,
            ?trigger,
            percentage = payload.score.percentage,
            passed = payload.score.is_passed,
            "submitting attempt"
        );

        let delivery = match sink.submit(&payload).await {
            Ok(ack) => Delivery::Acknowledged(ack),
            Err(e) => self.degrade(&payload, sink.name(), &e),
        };

        let report = SubmissionReport {
            payload,
            trigger,
            delivery,
        };
        self.report = Some(report.clone());
        self.state = SessionState::Submitted;
        tracing::info!(quiz = %self.config.quiz_id, "attempt submitted");
        Ok(SubmitOutcome::Submitted(report))
    }

    fn degrade(&mut self, payload: &SubmissionPayload, sink: &str, error: &anyhow::Error) -> Delivery {
        let retryable = error
            .downcast_ref::<SinkError>()
            .map_or(true, SinkError::is_retryable);
        let warning = format!("submission to {sink} failed: {error:#}");
        tracing::warn!(submission = %payload.submission_id, retryable, "{warning}");

        if !retryable {
            return Delivery::Failed { warning };
        }
        match self.pending.as_mut() {
            Some(queue) => match queue.push(payload.clone()) {
                Ok(_) => Delivery::Queued {
                    warning: format!("{warning}; saved to {} for retry", queue.path().display()),
                },
                Err(qe) => {
                    tracing::warn!(error = %qe, "failed to queue submission");
                    Delivery::Failed {
                        warning: format!("{warning}; could not queue for retry: {qe:#}"),
                    }
                }
            },
            None => Delivery::Failed { warning },
        }
    }

    /// Leave the attempt without submitting.
    pub fn abandon(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Loading | SessionState::InProgress => {
                self.timer.stop();
                self.state = SessionState::Abandoned;
                tracing::info!(quiz = %self.config.quiz_id, "attempt abandoned");
                Ok(())
            }
            state => Err(SessionError::WrongState {
                operation: "abandon",
                state,
            }),
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.timer.remaining()
    }

    pub fn unanswered_count(&self) -> usize {
        self.answers.unanswered_count(&self.questions)
    }

    /// Status of every question, in order.
    pub fn navigation(&self) -> Vec<NavStatus> {
        self.questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                if i == self.cursor {
                    NavStatus::Current
                } else if self.answers.is_answered(&q.id) {
                    NavStatus::Answered
                } else {
                    NavStatus::Unanswered
                }
            })
            .collect()
    }

    /// Score of the answers recorded so far. Does not change the session.
    pub fn score(&self) -> ScoreResult {
        compute_score(&self.questions, &self.answers, self.config.target_score)
    }

    /// The finalized result once `Submitted`.
    pub fn report(&self) -> Option<&SubmissionReport> {
        self.report.as_ref()
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable_reason.as_deref()
    }

    fn snapshot(&self) -> AttemptSnapshot<'_> {
        AttemptSnapshot {
            config: &self.config,
            questions: &self.questions,
            answers: &self.answers,
            student_id: self.student_id.as_deref(),
            remaining_secs: self.timer.remaining(),
        }
    }

    fn require(&self, expected: SessionState, operation: &'static str) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::WrongState {
                operation,
                state: self.state,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizDefinition;
    use crate::test_support::{sample_questions, RecordingSink, StaticSource};

    fn loaded(time_limit: i64) -> QuizSession {
        let mut session = QuizSession::new(
            QuizConfig::new("unit-1")
                .with_time_limit(time_limit)
                .with_target_score(70),
        );
        session.load_questions(sample_questions()).unwrap();
        session
    }

    fn answer_all_correctly(session: &mut QuizSession) {
        session.record_answer("mc", AnswerValue::Number(1)).unwrap();
        session.record_answer("tf", AnswerValue::Number(1)).unwrap();
        session.record_answer("dict", "apple".into()).unwrap();
    }

    #[test]
    fn empty_question_set_is_unavailable() {
        let mut session = QuizSession::new(QuizConfig::new("empty"));
        session.load_questions(vec![]).unwrap();
        assert_eq!(session.state(), SessionState::Unavailable);
        assert!(session.unavailable_reason().unwrap().contains("no questions"));
        assert!(session.next().is_err());
        assert_eq!(session.on_tick(), TickOutcome::Idle);
    }

    #[tokio::test]
    async fn failed_fetch_is_unavailable_not_a_crash() {
        let source = StaticSource::missing();
        let mut session = QuizSession::new(QuizConfig::new("gone"));
        session.load(&source).await.unwrap();
        assert_eq!(session.state(), SessionState::Unavailable);
        assert!(session.questions().is_empty());
        assert_eq!(source.starts(), 0);
    }

    #[tokio::test]
    async fn load_uses_fetched_config_and_records_start() {
        let source = StaticSource::new(QuizDefinition {
            config: QuizConfig::new("unit-1").with_time_limit(90).with_title("Fruit"),
            questions: sample_questions(),
        });
        let mut session = QuizSession::new(QuizConfig::new("unit-1")).with_student("s-1");
        session.load(&source).await.unwrap();
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.config().title, "Fruit");
        assert_eq!(session.remaining_secs(), 90);
        assert_eq!(source.starts(), 1);
        assert!(session.load(&source).await.is_err());
    }

    #[test]
    fn navigation_clamps() {
        let mut session = loaded(600);
        assert_eq!(session.previous().unwrap(), 0);
        assert_eq!(session.next().unwrap(), 1);
        assert_eq!(session.jump_to(99).unwrap(), 2);
        assert_eq!(session.next().unwrap(), 2);
        assert_eq!(session.remaining_secs(), 600);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn navigation_status() {
        let mut session = loaded(600);
        session.record_answer("tf", AnswerValue::Number(0)).unwrap();
        assert_eq!(
            session.navigation(),
            vec![NavStatus::Current, NavStatus::Answered, NavStatus::Unanswered]
        );
    }

    #[test]
    fn record_answer_rules() {
        let mut session = QuizSession::new(QuizConfig::new("unit-1"));
        assert!(matches!(
            session.record_answer("mc", AnswerValue::Number(1)),
            Err(SessionError::WrongState { .. })
        ));

        let mut session = loaded(600);
        assert_eq!(
            session.record_answer("nope", AnswerValue::Number(1)),
            Err(SessionError::UnknownQuestion("nope".into()))
        );
        session.jump_to(2).unwrap();
        assert_eq!(session.record_current("Apple".into()).unwrap(), "dict");
        session.record_answer("dict", "pear".into()).unwrap();
        assert_eq!(session.answers().get("dict"), Some(&AnswerValue::from("pear")));
    }

    #[tokio::test]
    async fn declined_confirmation_keeps_attempt_open() {
        let mut session = loaded(600);
        session.record_answer("mc", AnswerValue::Number(1)).unwrap();
        let sink = RecordingSink::new();

        let outcome = session
            .submit(SubmitTrigger::Manual, &mut AutoConfirm(false), &sink)
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Declined { unanswered: 2 });
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(sink.calls(), 0);
        assert!(matches!(session.on_tick(), TickOutcome::Ticked { remaining: 599 }));
    }

    #[tokio::test]
    async fn confirmed_submit_finalizes_once() {
        let mut session = loaded(600);
        let sink = RecordingSink::new();

        let first = session
            .submit(SubmitTrigger::Manual, &mut AutoConfirm(true), &sink)
            .await
            .unwrap();
        let second = session
            .submit(SubmitTrigger::Expired, &mut AutoConfirm(true), &sink)
            .await
            .unwrap();

        assert!(matches!(first, SubmitOutcome::Submitted(_)));
        assert_eq!(second, SubmitOutcome::AlreadySubmitted);
        assert_eq!(sink.calls(), 1);
        assert_eq!(session.state(), SessionState::Submitted);
        assert_eq!(session.on_tick(), TickOutcome::Idle);
        assert!(session.record_answer("mc", AnswerValue::Number(1)).is_err());
    }

    #[tokio::test]
    async fn expiry_submit_skips_confirmation() {
        let mut session = loaded(600);
        let sink = RecordingSink::new();
        let outcome = session
            .submit(SubmitTrigger::Expired, &mut AutoConfirm(false), &sink)
            .await
            .unwrap();
        let SubmitOutcome::Submitted(report) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(report.trigger, SubmitTrigger::Expired);
        assert_eq!(report.score().percentage, 0);
        assert_eq!(sink.calls(), 1);
    }

    #[test]
    fn zero_time_limit_expires_immediately() {
        let mut session = loaded(0);
        assert!(session.take_expiry());
        assert!(!session.take_expiry());
        let mut session = loaded(-10);
        assert!(session.take_expiry());
    }

    #[tokio::test]
    async fn all_correct_end_to_end() {
        let mut session = loaded(600);
        answer_all_correctly(&mut session);
        for _ in 0..45 {
            session.on_tick();
        }
        let remaining = session.remaining_secs();
        let sink = RecordingSink::new();

        let outcome = session
            .submit(SubmitTrigger::Manual, &mut AutoConfirm(false), &sink)
            .await
            .unwrap();
        let SubmitOutcome::Submitted(report) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(report.score().percentage, 100);
        assert!(report.score().is_passed);
        assert_eq!(report.payload.time_spent, 600 - remaining);
        assert_eq!(report.payload.time_spent, 45);
        assert!(matches!(report.delivery, Delivery::Acknowledged(_)));
        assert_eq!(sink.last().unwrap().submission_id, report.payload.submission_id);
        assert_eq!(session.report(), Some(&report));
    }

    #[tokio::test]
    async fn retryable_sink_failure_is_queued() {
        let dir = tempfile::tempdir().unwrap();
        let queue = PendingQueue::open(dir.path().join("pending.json")).unwrap();
        let mut session = QuizSession::new(QuizConfig::new("unit-1")).with_pending_queue(queue);
        session.load_questions(sample_questions()).unwrap();
        answer_all_correctly(&mut session);

        let sink = RecordingSink::failing(SinkError::Unreachable("connection refused".into()));
        let outcome = session
            .submit(SubmitTrigger::Manual, &mut AutoConfirm(true), &sink)
            .await
            .unwrap();
        let SubmitOutcome::Submitted(report) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert!(matches!(report.delivery, Delivery::Queued { .. }));
        assert!(report.warning().unwrap().contains("connection refused"));
        assert_eq!(report.score().percentage, 100);
        assert_eq!(session.state(), SessionState::Submitted);

        let queued = PendingQueue::open(dir.path().join("pending.json")).unwrap();
        assert_eq!(queued.len(), 1);
    }

    #[tokio::test]
    async fn refused_submission_is_a_warning_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pending.json");
        let mut session = QuizSession::new(QuizConfig::new("unit-1"))
            .with_pending_queue(PendingQueue::open(&path).unwrap());
        session.load_questions(sample_questions()).unwrap();

        let sink = RecordingSink::failing(SinkError::Unauthorized("bad token".into()));
        let outcome = session
            .submit(SubmitTrigger::Expired, &mut AutoConfirm(true), &sink)
            .await
            .unwrap();
        let SubmitOutcome::Submitted(report) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert!(matches!(report.delivery, Delivery::Failed { .. }));
        assert_eq!(session.state(), SessionState::Submitted);
        assert!(!path.exists());
    }

    #[test]
    fn abandon_only_before_submission() {
        let mut session = loaded(600);
        session.abandon().unwrap();
        assert_eq!(session.state(), SessionState::Abandoned);
        assert_eq!(session.on_tick(), TickOutcome::Idle);
        assert!(session.abandon().is_err());

        let mut session = QuizSession::new(QuizConfig::new("unit-1"));
        session.abandon().unwrap();
        assert!(session.state().is_terminal());
    }

    #[test]
    fn score_preview_does_not_change_state() {
        let mut session = loaded(600);
        session.record_answer("dict", "APPLE ".into()).unwrap();
        let score = session.score();
        assert_eq!(score.earned_points, 2);
        assert_eq!(score.percentage, 50);
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.score(), score);
    }
}
