//! Durable retry queue for submissions the sink could not accept.
//!
//! The queue is a JSON file holding a list of payloads. Entries are keyed by
//! `submissionId`, so pushing the same attempt twice keeps one copy and a
//! flush never sends an attempt more than once per pass.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};

use crate::error::SinkError;
use crate::submission::SubmissionPayload;
use crate::traits::SubmissionSink;

/// Counts from one [`PendingQueue::flush`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Acknowledged by the sink and removed.
    pub sent: usize,
    /// Failed with a retryable error and kept for the next pass.
    pub kept: usize,
    /// Refused permanently and removed.
    pub dropped: usize,
}

/// File-backed list of payloads waiting to be resent.
#[derive(Debug)]
pub struct PendingQueue {
    path: PathBuf,
    entries: Vec<SubmissionPayload>,
}

enum Attempt {
    Sent,
    Keep(SubmissionPayload),
    Drop,
}

impl PendingQueue {
    /// Open the queue at `path`. A missing file is an empty queue.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read pending queue {}", path.display()))?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("failed to parse pending queue {}", path.display()))?
            }
        } else {
            Vec::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SubmissionPayload] {
        &self.entries
    }

    /// Add a payload and persist. Returns `false` if it was already queued.
    pub fn push(&mut self, payload: SubmissionPayload) -> Result<bool> {
        if self
            .entries
            .iter()
            .any(|p| p.submission_id == payload.submission_id)
        {
            tracing::debug!(submission = %payload.submission_id, "submission already queued");
            return Ok(false);
        }
        tracing::info!(
            submission = %payload.submission_id,
            quiz = %payload.quiz_id,
            "queued submission for retry"
        );
        self.entries.push(payload);
        self.persist()?;
        Ok(true)
    }

    /// Resend every entry in order, then persist what is left.
    pub async fn flush(&mut self, sink: &dyn SubmissionSink) -> Result<FlushReport> {
        let entries = std::mem::take(&mut self.entries);
        let attempts: Vec<Attempt> = stream::iter(entries)
            .then(|payload| async move {
                match sink.submit(&payload).await {
                    Ok(_) => {
                        tracing::info!(submission = %payload.submission_id, "queued submission delivered");
                        Attempt::Sent
                    }
                    Err(e) => {
                        let retryable = e
                            .downcast_ref::<SinkError>()
                            .map_or(true, SinkError::is_retryable);
                        if retryable {
                            tracing::warn!(submission = %payload.submission_id, error = %e, "resend failed, keeping");
                            Attempt::Keep(payload)
                        } else {
                            tracing::warn!(submission = %payload.submission_id, error = %e, "resend refused, dropping");
                            Attempt::Drop
                        }
                    }
                }
            })
            .collect()
            .await;

        let mut report = FlushReport::default();
        for attempt in attempts {
            match attempt {
                Attempt::Sent => report.sent += 1,
                Attempt::Keep(payload) => {
                    report.kept += 1;
                    self.entries.push(payload);
                }
                Attempt::Drop => report.dropped += 1,
            }
        }
        self.persist()?;
        Ok(report)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create pending queue directory {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .context("failed to serialize pending queue")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write pending queue {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace pending queue {}", self.path.display()))?;
        Ok(())
    }
}
