//! Client configuration and sink factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizrun_core::traits::SubmissionSink;

use crate::file::DirectorySink;
use crate::http::{HttpQuizApi, DEFAULT_TIMEOUT_SECS};

/// Top-level quizrun configuration.
///
/// Note: Custom Debug impl masks the API token to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct QuizrunConfig {
    /// Quiz API server. Without one, quizzes come from files and
    /// submissions go to `output_dir`.
    #[serde(default)]
    pub server_url: Option<String>,
    /// Bearer token for the quiz API.
    #[serde(default)]
    pub api_token: Option<String>,
    /// Student identifier attached to submissions.
    #[serde(default)]
    pub student_id: Option<String>,
    /// HTTP request timeout.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// File holding submissions waiting to be resent.
    #[serde(default = "default_pending_queue")]
    pub pending_queue: PathBuf,
    /// Directory for saved results (and the offline outbox).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl std::fmt::Debug for QuizrunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizrunConfig")
            .field("server_url", &self.server_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("student_id", &self.student_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("pending_queue", &self.pending_queue)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_pending_queue() -> PathBuf {
    PathBuf::from("./quizrun-pending.json")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizrun-results")
}

impl Default for QuizrunConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            api_token: None,
            student_id: None,
            request_timeout_secs: default_timeout(),
            pending_queue: default_pending_queue(),
            output_dir: default_output_dir(),
        }
    }
}

impl QuizrunConfig {
    /// The HTTP client, if a server is configured.
    pub fn http_api(&self) -> Result<Option<HttpQuizApi>> {
        match self.server_url.as_deref() {
            Some(url) => Ok(Some(HttpQuizApi::new(
                url,
                self.api_token.clone(),
                self.request_timeout_secs,
            )?)),
            None => Ok(None),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in the string fields; empty results become `None`.
fn resolve_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| resolve_env_vars(&v))
        .filter(|v| !v.trim().is_empty())
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizrun.toml` in the current directory
/// 2. `~/.config/quizrun/config.toml`
///
/// Environment variable overrides: `QUIZRUN_SERVER_URL`, `QUIZRUN_API_TOKEN`,
/// `QUIZRUN_STUDENT_ID`.
pub fn load_config() -> Result<QuizrunConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizrunConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizrun.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config(&path)?,
        None => QuizrunConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("QUIZRUN_SERVER_URL") {
        config.server_url = Some(url);
    }
    if let Ok(token) = std::env::var("QUIZRUN_API_TOKEN") {
        config.api_token = Some(token);
    }
    if let Ok(student) = std::env::var("QUIZRUN_STUDENT_ID") {
        config.student_id = Some(student);
    }

    config.server_url = resolve_optional(config.server_url);
    config.api_token = resolve_optional(config.api_token);
    config.student_id = resolve_optional(config.student_id);

    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn parse_config(path: &Path) -> Result<QuizrunConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<QuizrunConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrun"))
}

/// Create the submission sink for a configuration: the quiz API when a
/// server is configured, otherwise a directory outbox under `output_dir`.
pub fn create_sink(config: &QuizrunConfig) -> Result<Box<dyn SubmissionSink>> {
    match config.http_api()? {
        Some(api) => Ok(Box::new(api)),
        None => Ok(Box::new(DirectorySink::new(config.output_dir.join("outbox")))),
    }
}
