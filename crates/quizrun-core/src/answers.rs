//! The answer store: question id to the student's latest answer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, Question, QuestionId};

/// Latest recorded answer per question. Re-answering overwrites; answers are
/// never removed. No shape validation happens here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    answers: BTreeMap<QuestionId, AnswerValue>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, returning the one it replaced.
    pub fn record(&mut self, question_id: impl Into<QuestionId>, value: AnswerValue) -> Option<AnswerValue> {
        self.answers.insert(question_id.into(), value)
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    /// `true` if the question has a recorded, non-blank answer.
    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id).is_some_and(|a| !a.is_blank())
    }

    /// Number of `questions` with no answer, a `null` answer or an empty string.
    pub fn unanswered_count(&self, questions: &[Question]) -> usize {
        questions.iter().filter(|q| !self.is_answered(&q.id)).count()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.answers.iter()
    }
}
