//! The attempt driver.
//!
//! [`run_attempt`] runs one loaded [`QuizSession`] to completion on the
//! current task. It waits on two things at once: the one-second tick
//! schedule and a channel of [`AttemptCommand`]s from the UI. The schedule
//! is owned by the driver and cancelled on every exit, so no tick reaches a
//! session after it leaves `InProgress`.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::SessionError;
use crate::model::{AnswerValue, Question, QuestionId};
use crate::session::{
    AutoConfirm, ConfirmSubmit, QuizSession, SessionState, SubmissionReport, SubmitOutcome,
    SubmitTrigger,
};
use crate::timer::{TickOutcome, TickSchedule, TICK_PERIOD};
use crate::traits::SubmissionSink;

/// Input events from the student.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptCommand {
    Next,
    Previous,
    JumpTo(usize),
    /// Answer the current question.
    Answer(AnswerValue),
    /// Answer the current question with raw typed text, interpreted by the
    /// question's type.
    AnswerText(String),
    AnswerFor {
        question_id: QuestionId,
        value: AnswerValue,
    },
    Submit,
    /// Reply to a pending unanswered-questions confirmation.
    Confirm(bool),
    Abandon,
}

/// How an attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Submitted(SubmissionReport),
    Abandoned,
    /// The session never reached `InProgress`.
    Unavailable(String),
}

/// Attempt progress callbacks.
pub trait AttemptObserver: Send + Sync {
    fn on_tick(&self, remaining: u64);
    fn on_navigate(&self, index: usize, question: &Question);
    fn on_answer(&self, question_id: &str, value: &AnswerValue);
    fn on_confirm_requested(&self, unanswered: usize);
    fn on_rejected(&self, error: &SessionError);
    fn on_expired(&self);
    fn on_submitted(&self, report: &SubmissionReport);
}

/// No-op observer.
pub struct NoopObserver;

impl AttemptObserver for NoopObserver {
    fn on_tick(&self, _: u64) {}
    fn on_navigate(&self, _: usize, _: &Question) {}
    fn on_answer(&self, _: &str, _: &AnswerValue) {}
    fn on_confirm_requested(&self, _: usize) {}
    fn on_rejected(&self, _: &SessionError) {}
    fn on_expired(&self) {}
    fn on_submitted(&self, _: &SubmissionReport) {}
}

/// Reads the confirmation reply as the next command on the channel.
/// Anything other than `Confirm(true)` declines. A command other than
/// `Confirm` is kept in `deferred` and runs after the decline. The
/// countdown does not advance while the prompt is open.
struct ChannelConfirm<'a> {
    commands: &'a mut mpsc::Receiver<AttemptCommand>,
    observer: &'a dyn AttemptObserver,
    deferred: Option<AttemptCommand>,
}

#[async_trait]
impl ConfirmSubmit for ChannelConfirm<'_> {
    async fn confirm_unanswered(&mut self, unanswered: usize) -> bool {
        self.observer.on_confirm_requested(unanswered);
        match self.commands.recv().await {
            Some(AttemptCommand::Confirm(yes)) => yes,
            Some(other) => {
                tracing::debug!(?other, "confirmation declined by another command");
                self.deferred = Some(other);
                false
            }
            None => false,
        }
    }
}

enum Event {
    Tick,
    Command(Option<AttemptCommand>),
}

/// Drive `session` until it is submitted or abandoned.
///
/// A closed command channel abandons the attempt.
pub async fn run_attempt(
    session: &mut QuizSession,
    commands: &mut mpsc::Receiver<AttemptCommand>,
    sink: &dyn SubmissionSink,
    observer: &dyn AttemptObserver,
) -> AttemptOutcome {
    if session.state() != SessionState::InProgress {
        return settled(session);
    }

    let mut schedule = TickSchedule::start(TICK_PERIOD);
    let mut deferred = None;
    announce_current(session, observer);

    let outcome = loop {
        if session.take_expiry() {
            break expire(session, sink, observer).await;
        }

        let event = match deferred.take() {
            Some(command) => Event::Command(Some(command)),
            None => tokio::select! {
                _ = schedule.next() => Event::Tick,
                command = commands.recv() => Event::Command(command),
            },
        };

        match event {
            Event::Tick => match session.on_tick() {
                TickOutcome::Ticked { remaining } => observer.on_tick(remaining),
                TickOutcome::Expired => {
                    observer.on_tick(0);
                    break expire(session, sink, observer).await;
                }
                TickOutcome::Idle => {}
            },
            Event::Command(None) => {
                tracing::info!("command stream closed");
                break abandon(session);
            }
            Event::Command(Some(command)) => {
                if let Some(outcome) =
                    handle(session, command, commands, &mut deferred, sink, observer).await
                {
                    break outcome;
                }
            }
        }
    };

    schedule.cancel();
    outcome
}

async fn handle(
    session: &mut QuizSession,
    command: AttemptCommand,
    commands: &mut mpsc::Receiver<AttemptCommand>,
    deferred: &mut Option<AttemptCommand>,
    sink: &dyn SubmissionSink,
    observer: &dyn AttemptObserver,
) -> Option<AttemptOutcome> {
    let result = match command {
        AttemptCommand::Next => session.next().map(|_| announce_current(session, observer)),
        AttemptCommand::Previous => session.previous().map(|_| announce_current(session, observer)),
        AttemptCommand::JumpTo(index) => session
            .jump_to(index)
            .map(|_| announce_current(session, observer)),
        AttemptCommand::Answer(value) => answer_current(session, value, observer),
        AttemptCommand::AnswerText(text) => match session.current_question() {
            Some(question) => {
                let value = question.parse_answer(&text);
                answer_current(session, value, observer)
            }
            None => Err(SessionError::NoQuestions),
        },
        AttemptCommand::AnswerFor { question_id, value } => session
            .record_answer(&question_id, value.clone())
            .map(|()| observer.on_answer(&question_id, &value)),
        AttemptCommand::Submit => {
            let mut confirm = ChannelConfirm {
                commands,
                observer,
                deferred: None,
            };
            let submitted = session.submit(SubmitTrigger::Manual, &mut confirm, sink).await;
            *deferred = confirm.deferred.take();
            return match submitted {
                Ok(SubmitOutcome::Submitted(report)) => {
                    observer.on_submitted(&report);
                    Some(AttemptOutcome::Submitted(report))
                }
                Ok(SubmitOutcome::Declined { .. }) => None,
                Ok(SubmitOutcome::AlreadySubmitted) => Some(settled(session)),
                Err(e) => {
                    observer.on_rejected(&e);
                    None
                }
            };
        }
        AttemptCommand::Confirm(_) => {
            tracing::debug!("confirmation received with no pending submit");
            Ok(())
        }
        AttemptCommand::Abandon => return Some(abandon(session)),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command rejected");
        observer.on_rejected(&e);
    }
    None
}

fn answer_current(
    session: &mut QuizSession,
    value: AnswerValue,
    observer: &dyn AttemptObserver,
) -> Result<(), SessionError> {
    let id = session.record_current(value.clone())?;
    observer.on_answer(&id, &value);
    Ok(())
}

fn announce_current(session: &QuizSession, observer: &dyn AttemptObserver) {
    if let Some(question) = session.current_question() {
        observer.on_navigate(session.cursor(), question);
    }
}

async fn expire(
    session: &mut QuizSession,
    sink: &dyn SubmissionSink,
    observer: &dyn AttemptObserver,
) -> AttemptOutcome {
    tracing::info!(quiz = %session.config().quiz_id, "time is up, submitting");
    observer.on_expired();
    match session
        .submit(SubmitTrigger::Expired, &mut AutoConfirm(true), sink)
        .await
    {
        Ok(SubmitOutcome::Submitted(report)) => {
            observer.on_submitted(&report);
            AttemptOutcome::Submitted(report)
        }
        _ => settled(session),
    }
}

fn abandon(session: &mut QuizSession) -> AttemptOutcome {
    if let Err(e) = session.abandon() {
        tracing::debug!(error = %e, "abandon ignored");
    }
    settled(session)
}

/// Outcome for a session that is not (or no longer) running.
fn settled(session: &QuizSession) -> AttemptOutcome {
    match session.state() {
        SessionState::Unavailable => AttemptOutcome::Unavailable(
            session
                .unavailable_reason()
                .unwrap_or("quiz unavailable")
                .to_string(),
        ),
        SessionState::Loading => AttemptOutcome::Unavailable("quiz has not been loaded".into()),
        _ => match session.report() {
            Some(report) => AttemptOutcome::Submitted(report.clone()),
            None => AttemptOutcome::Abandoned,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::model::QuizConfig;
    use crate::test_support::{sample_questions, RecordingSink};

    #[derive(Default)]
    struct CountingObserver {
        ticks: AtomicU32,
        expired: AtomicU32,
        confirms: AtomicU32,
        rejected: AtomicU32,
        navigated: Mutex<Vec<usize>>,
    }

    impl AttemptObserver for CountingObserver {
        fn on_tick(&self, _: u64) {
            self.ticks.fetch_add(1, Ordering::SeqCst);
        }
        fn on_navigate(&self, index: usize, _: &Question) {
            self.navigated.lock().unwrap().push(index);
        }
        fn on_answer(&self, _: &str, _: &AnswerValue) {}
        fn on_confirm_requested(&self, _: usize) {
            self.confirms.fetch_add(1, Ordering::SeqCst);
        }
        fn on_rejected(&self, _: &SessionError) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
        }
        fn on_expired(&self) {
            self.expired.fetch_add(1, Ordering::SeqCst);
        }
        fn on_submitted(&self, _: &SubmissionReport) {}
    }

    fn session(time_limit: i64) -> QuizSession {
        let mut session = QuizSession::new(QuizConfig::new("unit-1").with_time_limit(time_limit));
        session.load_questions(sample_questions()).unwrap();
        session
    }

    async fn send_all(tx: &mpsc::Sender<AttemptCommand>, commands: Vec<AttemptCommand>) {
        for command in commands {
            tx.send(command).await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_submits_without_confirmation() {
        let mut session = session(5);
        let (_tx, mut rx) = mpsc::channel(8);
        let sink = RecordingSink::new();
        let observer = CountingObserver::default();

        let outcome = run_attempt(&mut session, &mut rx, &sink, &observer).await;

        let AttemptOutcome::Submitted(report) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(report.trigger, SubmitTrigger::Expired);
        assert_eq!(report.payload.time_spent, 5);
        assert_eq!(sink.calls(), 1);
        assert_eq!(observer.ticks.load(Ordering::SeqCst), 5);
        assert_eq!(observer.expired.load(Ordering::SeqCst), 1);
        assert_eq!(observer.confirms.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_time_limit_submits_immediately() {
        let mut session = session(0);
        let (_tx, mut rx) = mpsc::channel(8);
        let sink = RecordingSink::new();
        let observer = CountingObserver::default();

        let outcome = run_attempt(&mut session, &mut rx, &sink, &observer).await;
        assert!(matches!(outcome, AttemptOutcome::Submitted(_)));
        assert_eq!(observer.ticks.load(Ordering::SeqCst), 0);
        assert_eq!(sink.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn answered_submit_needs_no_confirmation() {
        let mut session = session(600);
        let (tx, mut rx) = mpsc::channel(16);
        send_all(
            &tx,
            vec![
                AttemptCommand::AnswerText("b".into()),
                AttemptCommand::Next,
                AttemptCommand::AnswerText("o".into()),
                AttemptCommand::Next,
                AttemptCommand::Answer(" Apple ".into()),
                AttemptCommand::Submit,
            ],
        )
        .await;
        let sink = RecordingSink::new();
        let observer = CountingObserver::default();

        let outcome = run_attempt(&mut session, &mut rx, &sink, &observer).await;
        let AttemptOutcome::Submitted(report) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(report.trigger, SubmitTrigger::Manual);
        assert_eq!(report.score().percentage, 100);
        assert_eq!(report.payload.time_spent, 0);
        assert_eq!(observer.confirms.load(Ordering::SeqCst), 0);
        assert_eq!(*observer.navigated.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn declined_confirmation_continues_attempt() {
        let mut session = session(600);
        let (tx, mut rx) = mpsc::channel(16);
        send_all(
            &tx,
            vec![
                AttemptCommand::Submit,
                AttemptCommand::Confirm(false),
                AttemptCommand::Abandon,
            ],
        )
        .await;
        let sink = RecordingSink::new();
        let observer = CountingObserver::default();

        let outcome = run_attempt(&mut session, &mut rx, &sink, &observer).await;
        assert_eq!(outcome, AttemptOutcome::Abandoned);
        assert_eq!(observer.confirms.load(Ordering::SeqCst), 1);
        assert_eq!(sink.calls(), 0);
        assert_eq!(session.state(), SessionState::Abandoned);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_at_confirmation_prompt_abandons() {
        let mut session = session(600);
        let (tx, mut rx) = mpsc::channel(16);
        send_all(&tx, vec![AttemptCommand::Submit, AttemptCommand::Abandon]).await;
        let sink = RecordingSink::new();
        let observer = CountingObserver::default();

        let outcome = run_attempt(&mut session, &mut rx, &sink, &observer).await;
        assert_eq!(outcome, AttemptOutcome::Abandoned);
        assert_eq!(observer.confirms.load(Ordering::SeqCst), 1);
        assert_eq!(sink.calls(), 0);
        assert_eq!(session.state(), SessionState::Abandoned);
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_at_confirmation_prompt_declines_then_moves() {
        let mut session = session(600);
        let (tx, mut rx) = mpsc::channel(16);
        send_all(
            &tx,
            vec![
                AttemptCommand::Submit,
                AttemptCommand::Next,
                AttemptCommand::Abandon,
            ],
        )
        .await;
        let observer = CountingObserver::default();

        let outcome = run_attempt(&mut session, &mut rx, &RecordingSink::new(), &observer).await;
        assert_eq!(outcome, AttemptOutcome::Abandoned);
        assert_eq!(*observer.navigated.lock().unwrap(), vec![0, 1]);
        assert_eq!(session.cursor(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_submit_with_unanswered() {
        let mut session = session(600);
        let (tx, mut rx) = mpsc::channel(16);
        send_all(&tx, vec![AttemptCommand::Submit, AttemptCommand::Confirm(true)]).await;
        let sink = RecordingSink::new();

        let outcome = run_attempt(&mut session, &mut rx, &sink, &NoopObserver).await;
        let AttemptOutcome::Submitted(report) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(report.score().percentage, 0);
        assert_eq!(sink.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_commands_are_reported() {
        let mut session = session(600);
        let (tx, mut rx) = mpsc::channel(16);
        send_all(
            &tx,
            vec![
                AttemptCommand::AnswerFor {
                    question_id: "missing".into(),
                    value: AnswerValue::Number(1),
                },
                AttemptCommand::Confirm(true),
                AttemptCommand::Abandon,
            ],
        )
        .await;
        let observer = CountingObserver::default();

        let outcome = run_attempt(&mut session, &mut rx, &RecordingSink::new(), &observer).await;
        assert_eq!(outcome, AttemptOutcome::Abandoned);
        assert_eq!(observer.rejected.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_abandons() {
        let mut session = session(600);
        let (tx, mut rx) = mpsc::channel(1);
        drop(tx);
        let sink = RecordingSink::new();

        let outcome = run_attempt(&mut session, &mut rx, &sink, &NoopObserver).await;
        assert_eq!(outcome, AttemptOutcome::Abandoned);
        assert_eq!(sink.calls(), 0);
        assert_eq!(session.on_tick(), TickOutcome::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_session_never_starts() {
        let mut session = QuizSession::new(QuizConfig::new("empty"));
        session.load_questions(vec![]).unwrap();
        let (_tx, mut rx) = mpsc::channel(1);

        let outcome = run_attempt(&mut session, &mut rx, &RecordingSink::new(), &NoopObserver).await;
        assert!(matches!(outcome, AttemptOutcome::Unavailable(reason) if reason.contains("no questions")));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_advance_between_commands() {
        let mut session = session(600);
        let (tx, mut rx) = mpsc::channel(16);
        let sink = RecordingSink::new();

        let driver = async {
            let outcome = run_attempt(&mut session, &mut rx, &sink, &NoopObserver).await;
            (outcome, session.remaining_secs())
        };
        let input = async {
            tokio::time::sleep(std::time::Duration::from_millis(30_500)).await;
            tx.send(AttemptCommand::Submit).await.unwrap();
            tx.send(AttemptCommand::Confirm(true)).await.unwrap();
        };
        let ((outcome, remaining), ()) = tokio::join!(driver, input);

        let AttemptOutcome::Submitted(report) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(remaining, 570);
        assert_eq!(report.payload.time_spent, 30);
    }
}
