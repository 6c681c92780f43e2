//! Fixtures shared by the unit tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::answers::AnswerStore;
use crate::error::SinkError;
use crate::model::{AnswerValue, Question, QuestionKind, QuizConfig, QuizDefinition};
use crate::submission::{assemble, AttemptSnapshot, SubmissionPayload};
use crate::traits::{QuestionSource, SubmissionAck, SubmissionSink};

/// Multiple choice (1 pt), true/false (1 pt) and dictation (2 pts).
pub(crate) fn sample_questions() -> Vec<Question> {
    vec![
        Question {
            id: "mc".into(),
            kind: QuestionKind::MultipleChoice,
            prompt: "Which one is yellow?".into(),
            points: 1,
            options: vec!["apple".into(), "banana".into(), "cherry".into()],
            correct_answer: Some(AnswerValue::Number(1)),
        },
        Question {
            id: "tf".into(),
            kind: QuestionKind::TrueFalse,
            prompt: "A tomato is a fruit.".into(),
            points: 1,
            options: vec![],
            correct_answer: Some("1".into()),
        },
        Question {
            id: "dict".into(),
            kind: QuestionKind::Dictation,
            prompt: "Write the word you hear.".into(),
            points: 2,
            options: vec![],
            correct_answer: Some("apple".into()),
        },
    ]
}

/// Dictation question `d{i}` whose answer is `word{i}`.
pub(crate) fn one_point_dictation(i: usize) -> Question {
    Question {
        id: format!("d{i}"),
        kind: QuestionKind::Dictation,
        prompt: format!("Spell word {i}"),
        points: 1,
        options: vec![],
        correct_answer: Some(format!("word{i}").into()),
    }
}

/// A fresh payload (new submission id) for the sample quiz.
pub(crate) fn sample_payload() -> SubmissionPayload {
    let config = QuizConfig::new("unit-1");
    let questions = sample_questions();
    let mut answers = AnswerStore::new();
    answers.record("mc", AnswerValue::Number(1));
    assemble(
        AttemptSnapshot {
            config: &config,
            questions: &questions,
            answers: &answers,
            student_id: Some("s-1"),
            remaining_secs: 300,
        },
        Utc::now(),
    )
}

/// Sink that counts calls and optionally fails every one.
pub(crate) struct RecordingSink {
    calls: AtomicU32,
    last: Mutex<Option<SubmissionPayload>>,
    failure: Option<SinkError>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
            last: Mutex::new(None),
            failure: None,
        }
    }

    pub(crate) fn failing(error: SinkError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last(&self) -> Option<SubmissionPayload> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn submit(&self, payload: &SubmissionPayload) -> anyhow::Result<SubmissionAck> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(payload.clone());
        match &self.failure {
            Some(error) => Err(error.clone().into()),
            None => Ok(SubmissionAck::with_receipt(payload.submission_id.to_string())),
        }
    }
}

/// Source serving one fixed quiz, or nothing.
pub(crate) struct StaticSource {
    quiz: Option<QuizDefinition>,
    starts: AtomicU32,
}

impl StaticSource {
    pub(crate) fn new(quiz: QuizDefinition) -> Self {
        Self {
            quiz: Some(quiz),
            starts: AtomicU32::new(0),
        }
    }

    pub(crate) fn missing() -> Self {
        Self {
            quiz: None,
            starts: AtomicU32::new(0),
        }
    }

    pub(crate) fn starts(&self) -> u32 {
        self.starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_quiz(&self, quiz_id: &str) -> anyhow::Result<QuizDefinition> {
        self.quiz
            .clone()
            .ok_or_else(|| anyhow::anyhow!("quiz not found: {quiz_id}"))
    }

    async fn start_attempt(&self, _quiz_id: &str, _student_id: Option<&str>) -> anyhow::Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
