//! Presentation helpers: remaining-time formatting, urgency bands and
//! display-normalized answers.

use serde::{Deserialize, Serialize};

use crate::grader::normalize_dictation;
use crate::model::{AnswerValue, Question, QuestionKind};

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_remaining(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// How urgently the remaining time should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBand {
    Plenty,
    Low,
    Critical,
}

impl TimeBand {
    pub fn for_remaining(secs: u64) -> Self {
        match secs {
            0..=300 => TimeBand::Critical,
            301..=900 => TimeBand::Low,
            _ => TimeBand::Plenty,
        }
    }
}

/// Letter label for an option index (`0` is `A`).
pub fn option_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|&i| i < 26)
        .map(|i| char::from(b'A' + i))
}

/// Render a multiple-choice option as `B. banana`.
pub fn option_label(question: &Question, index: usize) -> Option<String> {
    let option = question.options.get(index)?;
    let letter = option_letter(index)?;
    Some(format!("{letter}. {option}"))
}

/// Display form of a recorded answer for `question`.
pub fn display_answer(question: &Question, value: &AnswerValue) -> String {
    match question.kind {
        QuestionKind::MultipleChoice => value
            .as_integer()
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| option_label(question, i))
            .unwrap_or_else(|| value.to_string()),
        QuestionKind::TrueFalse => match value.as_integer() {
            Some(1) => "O".to_string(),
            Some(0) => "X".to_string(),
            _ => value.to_string(),
        },
        QuestionKind::Dictation => value.as_text().map(|t| t.trim().to_string()).unwrap_or_default(),
    }
}

/// Display form of the correct answer, if the question has a usable key.
pub fn display_correct(question: &Question) -> Option<String> {
    match question.kind {
        QuestionKind::MultipleChoice => question
            .correct_option_index()
            .and_then(|i| option_label(question, i)),
        QuestionKind::TrueFalse | QuestionKind::Dictation => {
            let key = question.correct_answer.as_ref()?;
            if question.kind == QuestionKind::Dictation
                && key.as_text().is_some_and(|t| normalize_dictation(&t).is_empty())
            {
                return None;
            }
            Some(display_answer(question, key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc() -> Question {
        Question {
            id: "q".into(),
            kind: QuestionKind::MultipleChoice,
            prompt: String::new(),
            points: 1,
            options: vec!["apple".into(), "banana".into()],
            correct_answer: Some(AnswerValue::Number(1)),
        }
    }

    #[test]
    fn formats_minutes_and_hours() {
        assert_eq!(format_remaining(0), "0:00");
        assert_eq!(format_remaining(65), "1:05");
        assert_eq!(format_remaining(600), "10:00");
        assert_eq!(format_remaining(3725), "1:02:05");
    }

    #[test]
    fn time_bands() {
        assert_eq!(TimeBand::for_remaining(300), TimeBand::Critical);
        assert_eq!(TimeBand::for_remaining(301), TimeBand::Low);
        assert_eq!(TimeBand::for_remaining(900), TimeBand::Low);
        assert_eq!(TimeBand::for_remaining(901), TimeBand::Plenty);
    }

    #[test]
    fn multiple_choice_labels() {
        let q = mc();
        assert_eq!(display_answer(&q, &AnswerValue::Number(0)), "A. apple");
        assert_eq!(display_answer(&q, &AnswerValue::Number(5)), "5");
        assert_eq!(display_correct(&q).as_deref(), Some("B. banana"));
    }

    #[test]
    fn true_false_labels() {
        let mut q = mc();
        q.kind = QuestionKind::TrueFalse;
        q.correct_answer = Some("1".into());
        assert_eq!(display_answer(&q, &AnswerValue::Number(0)), "X");
        assert_eq!(display_correct(&q).as_deref(), Some("O"));
    }

    #[test]
    fn dictation_trims() {
        let mut q = mc();
        q.kind = QuestionKind::Dictation;
        q.correct_answer = Some("Apple".into());
        assert_eq!(display_answer(&q, &" apple ".into()), "apple");
        assert_eq!(display_correct(&q).as_deref(), Some("Apple"));
        q.correct_answer = Some(" ".into());
        assert_eq!(display_correct(&q), None);
    }

    #[test]
    fn missing_multiple_choice_key_has_no_display() {
        let mut q = mc();
        q.options.clear();
        assert_eq!(display_correct(&q), None);
    }
}
