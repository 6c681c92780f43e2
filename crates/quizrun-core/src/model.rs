//! Core data model types for quizrun.
//!
//! Questions and quiz configuration are immutable for the duration of an
//! attempt. Incoming records come from several authoring tools, so the
//! deserializers accept both camelCase and snake_case field names and a few
//! legacy spellings of the question types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a question within a quiz.
pub type QuestionId = String;

/// Time limit used when a quiz does not configure one.
pub const DEFAULT_TIME_LIMIT_SECS: i64 = 600;

/// Pass threshold used when a quiz does not configure one.
pub const DEFAULT_TARGET_SCORE: u32 = 70;

/// Title used when a quiz does not configure one.
pub const DEFAULT_TITLE: &str = "Untitled quiz";

/// The supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    Dictation,
}

impl QuestionKind {
    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "Multiple choice",
            QuestionKind::TrueFalse => "True / false",
            QuestionKind::Dictation => "Dictation",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "multiple"),
            QuestionKind::TrueFalse => write!(f, "ox"),
            QuestionKind::Dictation => write!(f, "dictation"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple" | "multiple_choice" | "mc" => Ok(QuestionKind::MultipleChoice),
            "ox" | "true_false" | "tf" => Ok(QuestionKind::TrueFalse),
            "dictation" | "essay" => Ok(QuestionKind::Dictation),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

impl Serialize for QuestionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for QuestionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A recorded answer, or the stored correct answer of a question.
///
/// Values arrive loosely typed (a true/false key may be `1` or `"1"`), so
/// comparisons always go through [`AnswerValue::as_integer`] or
/// [`AnswerValue::as_text`]. Integral floats (`1.0`) read as numbers; any
/// other shape is kept as [`AnswerValue::Invalid`] and never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Null,
    Bool(bool),
    Number(i64),
    Text(String),
    /// A value of an unusable type: fractional numbers, arrays, tables.
    Invalid(serde_json::Value),
}

impl<'de> Deserialize<'de> for AnswerValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw {
            serde_json::Value::Null => AnswerValue::Null,
            serde_json::Value::Bool(b) => AnswerValue::Bool(b),
            serde_json::Value::String(s) => AnswerValue::Text(s),
            serde_json::Value::Number(n) => match n.as_i64().or_else(|| n.as_f64().and_then(integral)) {
                Some(i) => AnswerValue::Number(i),
                None => AnswerValue::Invalid(serde_json::Value::Number(n)),
            },
            other => AnswerValue::Invalid(other),
        })
    }
}

fn integral(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

impl AnswerValue {
    /// `null` and the empty string count as "not answered".
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Null => true,
            AnswerValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Normalize to an integer: numbers as-is, booleans as 0/1, text parsed
    /// after trimming.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AnswerValue::Null => None,
            AnswerValue::Bool(b) => Some(i64::from(*b)),
            AnswerValue::Number(n) => Some(*n),
            AnswerValue::Text(s) => s.trim().parse().ok(),
            AnswerValue::Invalid(_) => None,
        }
    }

    /// Normalize to text. `null` and invalid values have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            AnswerValue::Null | AnswerValue::Invalid(_) => None,
            AnswerValue::Bool(b) => Some(b.to_string()),
            AnswerValue::Number(n) => Some(n.to_string()),
            AnswerValue::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Null => write!(f, "null"),
            AnswerValue::Bool(b) => write!(f, "{b}"),
            AnswerValue::Number(n) => write!(f, "{n}"),
            AnswerValue::Text(s) => write!(f, "{s}"),
            AnswerValue::Invalid(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for AnswerValue {
    fn from(n: i64) -> Self {
        AnswerValue::Number(n)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        AnswerValue::Bool(b)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::Text(s.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        AnswerValue::Text(s)
    }
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the quiz. Numeric ids are accepted and kept
    /// as their decimal text.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: QuestionId,
    /// Question type.
    #[serde(rename = "type", alias = "kind", alias = "questionType")]
    pub kind: QuestionKind,
    /// Prompt shown to the student.
    #[serde(default, alias = "question", alias = "stem")]
    pub prompt: String,
    /// Points awarded for a correct answer.
    #[serde(default = "default_points")]
    pub points: u32,
    /// Answer options (multiple choice only).
    #[serde(default)]
    pub options: Vec<String>,
    /// Correct option index, 0/1 flag or expected text, depending on `kind`.
    #[serde(default, alias = "correctAnswer")]
    pub correct_answer: Option<AnswerValue>,
}

fn default_points() -> u32 {
    1
}

impl Question {
    /// The correct option index of a multiple-choice question, if the stored
    /// key is an integer that addresses an existing option.
    pub fn correct_option_index(&self) -> Option<usize> {
        let index = self.correct_answer.as_ref()?.as_integer()?;
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.options.len())
    }

    /// Interpret raw text typed by a student for this question.
    ///
    /// Multiple choice accepts an option letter (`B`) or a 1-based number
    /// (`2`); true/false accepts `o`/`x`, `true`/`false`, `yes`/`no` and
    /// `1`/`0`; dictation keeps the text verbatim. Unrecognised input is
    /// recorded as text and will grade as incorrect.
    pub fn parse_answer(&self, input: &str) -> AnswerValue {
        let trimmed = input.trim();
        match self.kind {
            QuestionKind::MultipleChoice => {
                let mut chars = trimmed.chars();
                if let (Some(c), None) = (chars.next(), chars.next()) {
                    if c.is_ascii_alphabetic() {
                        let index = c.to_ascii_uppercase() as i64 - 'A' as i64;
                        return AnswerValue::Number(index);
                    }
                }
                match trimmed.parse::<i64>() {
                    Ok(n) => AnswerValue::Number(n - 1),
                    Err(_) => AnswerValue::Text(trimmed.to_string()),
                }
            }
            QuestionKind::TrueFalse => match trimmed.to_lowercase().as_str() {
                "o" | "true" | "t" | "yes" | "y" | "1" => AnswerValue::Number(1),
                "x" | "false" | "f" | "no" | "n" | "0" => AnswerValue::Number(0),
                _ => AnswerValue::Text(trimmed.to_string()),
            },
            QuestionKind::Dictation => AnswerValue::Text(input.to_string()),
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Quiz-level configuration consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Quiz identifier.
    pub quiz_id: String,
    /// Display title.
    pub title: String,
    /// Time limit in seconds. Zero or negative means the attempt expires
    /// as soon as it starts.
    pub time_limit_secs: i64,
    /// Percentage a result must reach to pass.
    pub target_score: u32,
}

impl QuizConfig {
    /// A configuration with default title, time limit and target score.
    pub fn new(quiz_id: impl Into<String>) -> Self {
        Self {
            quiz_id: quiz_id.into(),
            title: DEFAULT_TITLE.to_string(),
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            target_score: DEFAULT_TARGET_SCORE,
        }
    }

    pub fn with_time_limit(mut self, secs: i64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn with_target_score(mut self, target: u32) -> Self {
        self.target_score = target;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Quiz header fields as they appear in quiz files and API responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizHeader {
    #[serde(alias = "quizId", alias = "quiz_id", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, alias = "quizTitle", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        alias = "timeLimitSec",
        alias = "time_limit_sec",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_limit_secs: Option<i64>,
    #[serde(default, alias = "timeLimit", skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<i64>,
    #[serde(
        default,
        alias = "targetScore",
        alias = "passing_score",
        alias = "passingScore",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_score: Option<u32>,
}

impl QuizHeader {
    /// Resolve defaults: seconds win over minutes, then the default limit.
    pub fn into_config(self) -> QuizConfig {
        let time_limit_secs = self
            .time_limit_secs
            .or_else(|| self.time_limit_minutes.map(|m| m.saturating_mul(60)))
            .unwrap_or(DEFAULT_TIME_LIMIT_SECS);
        QuizConfig {
            quiz_id: self.id,
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            time_limit_secs,
            target_score: self.target_score.unwrap_or(DEFAULT_TARGET_SCORE),
        }
    }
}

impl From<&QuizConfig> for QuizHeader {
    fn from(config: &QuizConfig) -> Self {
        Self {
            id: config.quiz_id.clone(),
            title: Some(config.title.clone()),
            time_limit_secs: Some(config.time_limit_secs),
            time_limit_minutes: None,
            target_score: Some(config.target_score),
        }
    }
}

/// A quiz: its configuration and ordered question list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireQuiz", into = "WireQuiz")]
pub struct QuizDefinition {
    pub config: QuizConfig,
    pub questions: Vec<Question>,
}

/// Flat wire shape of a quiz (header fields next to `questions`).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireQuiz {
    #[serde(flatten)]
    header: QuizHeader,
    #[serde(default)]
    questions: Vec<Question>,
}

impl From<WireQuiz> for QuizDefinition {
    fn from(wire: WireQuiz) -> Self {
        Self {
            config: wire.header.into_config(),
            questions: wire.questions,
        }
    }
}

impl From<QuizDefinition> for WireQuiz {
    fn from(def: QuizDefinition) -> Self {
        Self {
            header: QuizHeader::from(&def.config),
            questions: def.questions,
        }
    }
}
