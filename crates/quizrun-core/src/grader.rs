//! Per-question correctness rules.
//!
//! Grading never fails: an unanswered question, a malformed answer key or an
//! answer of the wrong shape all grade as incorrect with zero points.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, Question, QuestionKind};

/// Outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub is_correct: bool,
    pub points_awarded: u32,
}

impl Grade {
    pub const INCORRECT: Grade = Grade {
        is_correct: false,
        points_awarded: 0,
    };

    fn correct(points: u32) -> Self {
        Self {
            is_correct: true,
            points_awarded: points,
        }
    }
}

/// Grade a recorded answer (or its absence) against a question.
pub fn grade(question: &Question, answer: Option<&AnswerValue>) -> Grade {
    let Some(answer) = answer.filter(|a| !a.is_blank()) else {
        return Grade::INCORRECT;
    };

    let is_correct = match question.kind {
        QuestionKind::TrueFalse => true_false_matches(question, answer),
        QuestionKind::Dictation => dictation_matches(question, answer),
        QuestionKind::MultipleChoice => multiple_choice_matches(question, answer),
    };

    if is_correct {
        Grade::correct(question.points)
    } else {
        Grade::INCORRECT
    }
}

/// Canonical form used to compare dictation answers.
pub fn normalize_dictation(text: &str) -> String {
    text.trim().to_lowercase()
}

fn true_false_matches(question: &Question, answer: &AnswerValue) -> bool {
    let expected = question.correct_answer.as_ref().and_then(AnswerValue::as_integer);
    match (expected, answer.as_integer()) {
        (Some(expected), Some(given)) => expected == given,
        _ => false,
    }
}

fn dictation_matches(question: &Question, answer: &AnswerValue) -> bool {
    let Some(expected) = question.correct_answer.as_ref().and_then(AnswerValue::as_text) else {
        return false;
    };
    let expected = normalize_dictation(&expected);
    // An empty key would otherwise accept a whitespace-only answer.
    if expected.is_empty() {
        return false;
    }
    answer
        .as_text()
        .is_some_and(|given| normalize_dictation(&given) == expected)
}

fn multiple_choice_matches(question: &Question, answer: &AnswerValue) -> bool {
    let Some(correct) = question.correct_option_index() else {
        tracing::debug!(question = %question.id, "multiple-choice question has no usable answer key");
        return false;
    };
    answer
        .as_integer()
        .and_then(|i| usize::try_from(i).ok())
        .is_some_and(|given| given == correct)
}
