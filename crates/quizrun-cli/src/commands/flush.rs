//! The `quizrun flush` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrun_client::config::load_config_from;
use quizrun_client::create_sink;
use quizrun_core::queue::PendingQueue;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let mut queue = PendingQueue::open(&config.pending_queue)?;

    if queue.is_empty() {
        println!("No pending submissions.");
        return Ok(());
    }

    let sink = create_sink(&config)?;
    eprintln!(
        "Resending {} pending submission(s) via {}",
        queue.len(),
        sink.name()
    );

    let report = queue.flush(sink.as_ref()).await?;
    println!(
        "Sent: {}, kept for retry: {}, dropped: {}",
        report.sent, report.kept, report.dropped
    );

    Ok(())
}
