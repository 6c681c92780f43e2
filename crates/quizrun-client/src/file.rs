//! Local file implementations: a quiz file as question source and a
//! directory of JSON files as submission sink.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;

use quizrun_core::error::SinkError;
use quizrun_core::model::QuizDefinition;
use quizrun_core::parser::parse_quiz_file;
use quizrun_core::submission::SubmissionPayload;
use quizrun_core::traits::{QuestionSource, SubmissionAck, SubmissionSink};

/// Serves the quiz defined in one TOML file.
pub struct FileQuizSource {
    path: PathBuf,
    quiz: QuizDefinition,
}

impl FileQuizSource {
    /// Parse the quiz file eagerly so authoring errors surface before an
    /// attempt starts.
    pub fn open(path: &Path) -> Result<Self> {
        let quiz = parse_quiz_file(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            quiz,
        })
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz.config.quiz_id
    }

    pub fn definition(&self) -> &QuizDefinition {
        &self.quiz
    }
}

#[async_trait]
impl QuestionSource for FileQuizSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_quiz(&self, quiz_id: &str) -> Result<QuizDefinition> {
        if quiz_id != self.quiz_id() {
            anyhow::bail!("quiz {quiz_id} not found in {}", self.path.display());
        }
        Ok(self.quiz.clone())
    }
}

/// Writes each submission to `submission-{id}.json` in a directory.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SubmissionSink for DirectorySink {
    fn name(&self) -> &str {
        "directory"
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionAck> {
        let json = serde_json::to_string_pretty(payload)
            .map_err(|e| SinkError::Rejected {
                status: 0,
                message: format!("failed to serialize submission: {e}"),
            })?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            SinkError::Unreachable(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let path = self.dir.join(payload.file_name());
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| SinkError::Unreachable(format!("failed to write {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), "submission written");
        Ok(SubmissionAck::with_receipt(path.display().to_string()))
    }
}
