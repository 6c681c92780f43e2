//! TOML quiz file parser.
//!
//! Loads quizzes from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionKind, QuizDefinition, QuizHeader};

/// Intermediate TOML structure for quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: QuizHeader,
    #[serde(default)]
    questions: Vec<Question>,
}

/// Parse a single TOML file into a `QuizDefinition`.
pub fn parse_quiz_file(path: &Path) -> Result<QuizDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `QuizDefinition`.
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<QuizDefinition> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    Ok(QuizDefinition {
        config: parsed.quiz.into_config(),
        questions: parsed.questions,
    })
}

/// Recursively load all `.toml` quiz files from a directory.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<QuizDefinition>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz_file(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// A warning from quiz validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn quiz(message: impl Into<String>) -> Self {
        Self {
            question_id: None,
            message: message.into(),
        }
    }

    fn question(question: &Question, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question.id.clone()),
            message: message.into(),
        }
    }
}

/// Validate a quiz for authoring mistakes the grader would silently
/// score as incorrect.
pub fn validate_quiz(quiz: &QuizDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let config = &quiz.config;

    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning::quiz("quiz has no questions"));
    }
    if config.time_limit_secs <= 0 {
        warnings.push(ValidationWarning::quiz(format!(
            "time limit is {}s; attempts will expire immediately",
            config.time_limit_secs
        )));
    }
    if config.target_score > 100 {
        warnings.push(ValidationWarning::quiz(format!(
            "target score {} is above 100; nobody can pass",
            config.target_score
        )));
    }

    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(question.id.as_str()) {
            warnings.push(ValidationWarning::question(
                question,
                format!("duplicate question ID: {}", question.id),
            ));
        }
        if question.prompt.trim().is_empty() {
            warnings.push(ValidationWarning::question(question, "prompt is empty"));
        }
        if question.points == 0 {
            warnings.push(ValidationWarning::question(question, "question is worth 0 points"));
        }
        if let Some(message) = answer_key_problem(question) {
            warnings.push(ValidationWarning::question(question, message));
        }
    }

    warnings
}

fn answer_key_problem(question: &Question) -> Option<String> {
    let key = question.correct_answer.as_ref();
    match question.kind {
        QuestionKind::MultipleChoice => {
            if question.options.is_empty() {
                return Some("multiple-choice question has no options".into());
            }
            let Some(index) = key.and_then(|k| k.as_integer()) else {
                return Some("multiple-choice correct answer is missing or not an option index".into());
            };
            if question.correct_option_index().is_none() {
                return Some(format!(
                    "correct option index {index} is out of range (0..{})",
                    question.options.len()
                ));
            }
            None
        }
        QuestionKind::TrueFalse => match key.and_then(|k| k.as_integer()) {
            Some(0 | 1) => None,
            _ => Some("true/false correct answer must be 0 or 1".into()),
        },
        QuestionKind::Dictation => {
            let has_text = key
                .and_then(|k| k.as_text())
                .is_some_and(|t| !t.trim().is_empty());
            (!has_text).then(|| "dictation question has no correct answer".to_string())
        }
    }
}
