//! quizrun-client: question sources and submission sinks.
//!
//! Implements the `QuestionSource` and `SubmissionSink` traits for the quiz
//! HTTP API and for local files, plus the client configuration that picks
//! between them.

pub mod config;
pub mod error;
pub mod file;
pub mod http;
pub mod mock;

pub use config::{create_sink, load_config, load_config_from, QuizrunConfig};
pub use error::ApiError;
pub use file::{DirectorySink, FileQuizSource};
pub use http::HttpQuizApi;
