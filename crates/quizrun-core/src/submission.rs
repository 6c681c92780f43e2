//! Score computation and submission payload assembly.
//!
//! Everything here is a pure function of the question list, the answer store
//! and the quiz configuration, so recomputing a result is deterministic.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::answers::AnswerStore;
use crate::display::{display_answer, display_correct};
use crate::grader::{grade, Grade};
use crate::model::{Question, QuestionId, QuestionKind, QuizConfig};

/// Aggregate score of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub correct_answers: usize,
    pub total_questions: usize,
    pub earned_points: u64,
    pub total_points: u64,
    /// `round(earned / total * 100)`, or 0 when the quiz is worth no points.
    pub percentage: u32,
    pub is_passed: bool,
    /// The target score the result was judged against.
    pub passing_score: u32,
}

/// Per-question breakdown entry, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub question_text: String,
    pub question_type: QuestionKind,
    pub user_answer: Option<String>,
    pub correct_answer: Option<String>,
    pub is_correct: bool,
    pub points: u32,
    pub points_earned: u32,
}

/// The payload handed to the submission sink and rendered locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Unique per attempt; lets the receiving service drop duplicates.
    pub submission_id: Uuid,
    pub quiz_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    /// Raw answers keyed by question id.
    pub answers: AnswerStore,
    pub submitted_at: DateTime<Utc>,
    /// Seconds spent, `time limit - remaining`, never negative.
    pub time_spent: u64,
    pub score: ScoreResult,
    pub question_results: Vec<QuestionResult>,
}

impl SubmissionPayload {
    /// Save the payload as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize submission")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write submission to {}", path.display()))?;
        Ok(())
    }

    /// Load a payload saved by [`save_json`](Self::save_json).
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission from {}", path.display()))?;
        let payload: SubmissionPayload =
            serde_json::from_str(&content).context("failed to parse submission JSON")?;
        Ok(payload)
    }

    /// Default file name for this payload.
    pub fn file_name(&self) -> String {
        format!("submission-{}.json", self.submission_id)
    }
}

/// `round(earned / total * 100)`, 0 when `total` is 0.
pub fn percentage(earned: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (earned as f64 / total as f64 * 100.0).round() as u32
}

/// Grade every question against the store, in question order.
pub fn grade_all(questions: &[Question], answers: &AnswerStore) -> Vec<Grade> {
    questions
        .iter()
        .map(|q| grade(q, answers.get(&q.id)))
        .collect()
}

/// Compute the aggregate score.
pub fn compute_score(questions: &[Question], answers: &AnswerStore, target_score: u32) -> ScoreResult {
    let grades = grade_all(questions, answers);
    score_from_grades(questions, &grades, target_score)
}

fn score_from_grades(questions: &[Question], grades: &[Grade], target_score: u32) -> ScoreResult {
    let earned_points = grades.iter().map(|g| u64::from(g.points_awarded)).sum();
    let total_points = questions.iter().map(|q| u64::from(q.points)).sum();
    let percentage = percentage(earned_points, total_points);
    ScoreResult {
        correct_answers: grades.iter().filter(|g| g.is_correct).count(),
        total_questions: questions.len(),
        earned_points,
        total_points,
        percentage,
        is_passed: percentage >= target_score,
        passing_score: target_score,
    }
}

/// Seconds spent on an attempt, clamped at zero.
pub fn time_spent(time_limit_secs: i64, remaining_secs: u64) -> u64 {
    let remaining = i64::try_from(remaining_secs).unwrap_or(i64::MAX);
    u64::try_from(time_limit_secs.saturating_sub(remaining)).unwrap_or(0)
}

/// The finished-attempt inputs the assembler reads.
#[derive(Debug, Clone, Copy)]
pub struct AttemptSnapshot<'a> {
    pub config: &'a QuizConfig,
    pub questions: &'a [Question],
    pub answers: &'a AnswerStore,
    pub student_id: Option<&'a str>,
    pub remaining_secs: u64,
}

/// Grade every question and build the submission payload.
pub fn assemble(snapshot: AttemptSnapshot<'_>, submitted_at: DateTime<Utc>) -> SubmissionPayload {
    let AttemptSnapshot {
        config,
        questions,
        answers,
        student_id,
        remaining_secs,
    } = snapshot;

    let grades = grade_all(questions, answers);
    let question_results = questions
        .iter()
        .zip(&grades)
        .map(|(q, g)| QuestionResult {
            question_id: q.id.clone(),
            question_text: q.prompt.clone(),
            question_type: q.kind,
            user_answer: answers
                .get(&q.id)
                .filter(|a| !a.is_blank())
                .map(|a| display_answer(q, a)),
            correct_answer: display_correct(q),
            is_correct: g.is_correct,
            points: q.points,
            points_earned: g.points_awarded,
        })
        .collect();

    SubmissionPayload {
        submission_id: Uuid::new_v4(),
        quiz_id: config.quiz_id.clone(),
        title: config.title.clone(),
        student_id: student_id.map(str::to_string),
        answers: answers.clone(),
        submitted_at,
        time_spent: time_spent(config.time_limit_secs, remaining_secs),
        score: score_from_grades(questions, &grades, config.target_score),
        question_results,
    }
}
