//! The `quizrun show` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizrun_core::display::format_remaining;
use quizrun_core::submission::SubmissionPayload;

pub fn execute(result_path: PathBuf) -> Result<()> {
    let payload = SubmissionPayload::load_json(&result_path)?;
    print_result(&payload);
    Ok(())
}

/// Print the per-question breakdown and the score summary.
pub fn print_result(payload: &SubmissionPayload) {
    println!("{} ({})", payload.title, payload.quiz_id);
    if let Some(student) = &payload.student_id {
        println!("Student: {student}");
    }
    println!(
        "Submitted: {}",
        payload.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Question",
        "Type",
        "Your answer",
        "Correct answer",
        "Result",
        "Points",
    ]);

    for (i, r) in payload.question_results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&r.question_text),
            Cell::new(r.question_type.label()),
            Cell::new(r.user_answer.as_deref().unwrap_or("-")),
            Cell::new(r.correct_answer.as_deref().unwrap_or("-")),
            Cell::new(if r.is_correct { "correct" } else { "wrong" }),
            Cell::new(format!("{}/{}", r.points_earned, r.points)),
        ]);
    }

    println!("{table}");

    let score = &payload.score;
    println!(
        "Score: {}/{} points, {}/{} correct ({}%)",
        score.earned_points,
        score.total_points,
        score.correct_answers,
        score.total_questions,
        score.percentage
    );
    println!(
        "Result: {} (target {}%)",
        if score.is_passed { "PASSED" } else { "FAILED" },
        score.passing_score
    );
    println!("Time spent: {}", format_remaining(payload.time_spent));
}
