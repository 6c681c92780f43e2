//! The `quizrun take` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use quizrun_client::config::load_config_from;
use quizrun_client::{create_sink, FileQuizSource};
use quizrun_core::display::{format_remaining, option_letter, TimeBand};
use quizrun_core::driver::{run_attempt, AttemptCommand, AttemptObserver, AttemptOutcome};
use quizrun_core::error::SessionError;
use quizrun_core::model::{AnswerValue, Question, QuestionKind, QuizConfig};
use quizrun_core::queue::PendingQueue;
use quizrun_core::session::{Delivery, QuizSession, SessionState, SubmissionReport};
use quizrun_core::traits::{QuestionSource, SubmissionSink};

use super::show::print_result;

const HELP: &str = "Commands: n (next), p (previous), j <num> (jump), a <answer> (answer), s (submit), q (quit)";

/// Console attempt observer.
struct ConsoleObserver {
    total: usize,
}

impl AttemptObserver for ConsoleObserver {
    fn on_tick(&self, remaining: u64) {
        let due = match TimeBand::for_remaining(remaining) {
            TimeBand::Plenty => remaining % 300 == 0,
            TimeBand::Low => remaining % 60 == 0,
            TimeBand::Critical => remaining % 60 == 0 || remaining <= 10,
        };
        if due && remaining > 0 {
            eprintln!("  [{} left]", format_remaining(remaining));
        }
    }

    fn on_navigate(&self, index: usize, question: &Question) {
        println!();
        println!(
            "Question {}/{} ({}, {} pt)",
            index + 1,
            self.total,
            question.kind.label(),
            question.points
        );
        println!("{}", question.prompt);
        match question.kind {
            QuestionKind::MultipleChoice => {
                for (i, option) in question.options.iter().enumerate() {
                    let letter = option_letter(i).unwrap_or('?');
                    println!("  {letter}. {option}");
                }
            }
            QuestionKind::TrueFalse => println!("  O (true) / X (false)"),
            QuestionKind::Dictation => {}
        }
    }

    fn on_answer(&self, question_id: &str, value: &AnswerValue) {
        eprintln!("  Recorded {question_id}: {value}");
    }

    fn on_confirm_requested(&self, unanswered: usize) {
        println!("{unanswered} question(s) unanswered. Submit anyway? [y/N]");
    }

    fn on_rejected(&self, error: &SessionError) {
        eprintln!("  {error}");
    }

    fn on_expired(&self) {
        println!("\nTime is up! Submitting your answers.");
    }

    fn on_submitted(&self, _: &SubmissionReport) {}
}

/// Parse one line of console input.
fn parse_command(line: &str) -> Option<AttemptCommand> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    match head.to_lowercase().as_str() {
        "n" | "next" => Some(AttemptCommand::Next),
        "p" | "prev" | "previous" => Some(AttemptCommand::Previous),
        "j" | "jump" => rest
            .parse::<usize>()
            .ok()
            .map(|n| AttemptCommand::JumpTo(n.saturating_sub(1))),
        "a" | "answer" if !rest.is_empty() => Some(AttemptCommand::AnswerText(rest.to_string())),
        "s" | "submit" => Some(AttemptCommand::Submit),
        "y" | "yes" => Some(AttemptCommand::Confirm(true)),
        "no" => Some(AttemptCommand::Confirm(false)),
        "q" | "quit" => Some(AttemptCommand::Abandon),
        _ => None,
    }
}

/// Forward stdin lines to the attempt. The channel closes at end of input.
fn spawn_input_reader(tx: mpsc::Sender<AttemptCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(command) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("  Unknown command. {HELP}"),
            }
        }
    });
}

pub async fn execute(
    quiz_path: Option<PathBuf>,
    quiz_id: Option<String>,
    student: Option<String>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let student = student.or_else(|| config.student_id.clone());

    let (source, quiz_id): (Box<dyn QuestionSource>, String) = match (quiz_path, quiz_id) {
        (Some(path), _) => {
            let source = FileQuizSource::open(&path)?;
            let id = source.quiz_id().to_string();
            (Box::new(source), id)
        }
        (None, Some(id)) => {
            let api = config.http_api()?.ok_or_else(|| {
                anyhow::anyhow!("--quiz-id needs server_url in config or QUIZRUN_SERVER_URL")
            })?;
            (Box::new(api), id)
        }
        (None, None) => anyhow::bail!("either --quiz or --quiz-id is required"),
    };

    let sink = create_sink(&config)?;
    tracing::info!(quiz = %quiz_id, source = source.name(), sink = sink.name(), "starting attempt");
    let queue = PendingQueue::open(&config.pending_queue)?;

    let mut session = QuizSession::new(QuizConfig::new(&quiz_id)).with_pending_queue(queue);
    if let Some(student) = student {
        session = session.with_student(student);
    }
    session.load(source.as_ref()).await?;

    if session.state() == SessionState::Unavailable {
        anyhow::bail!(
            "quiz unavailable: {}",
            session.unavailable_reason().unwrap_or("no questions")
        );
    }

    let quiz = session.config();
    println!(
        "{}: {} question(s), {} to finish, pass at {}%",
        quiz.title,
        session.questions().len(),
        format_remaining(session.remaining_secs()),
        quiz.target_score
    );
    println!("{HELP}");

    let (tx, mut rx) = mpsc::channel(32);
    spawn_input_reader(tx);

    let observer = ConsoleObserver {
        total: session.questions().len(),
    };
    let outcome = run_attempt(&mut session, &mut rx, sink.as_ref(), &observer).await;

    match outcome {
        AttemptOutcome::Submitted(report) => {
            println!();
            print_result(&report.payload);

            let path = output.join(report.payload.file_name());
            report
                .payload
                .save_json(&path)
                .context("failed to save result")?;
            eprintln!("Result saved to: {}", path.display());

            match &report.delivery {
                Delivery::Acknowledged(ack) => {
                    if let Some(receipt) = &ack.receipt {
                        eprintln!("Submitted via {} ({receipt})", sink.name());
                    }
                }
                Delivery::Queued { warning } | Delivery::Failed { warning } => {
                    eprintln!("Warning: {warning}");
                }
            }
        }
        AttemptOutcome::Abandoned => {
            println!("Attempt abandoned; nothing was submitted.");
        }
        AttemptOutcome::Unavailable(reason) => anyhow::bail!("quiz unavailable: {reason}"),
    }

    Ok(())
}
