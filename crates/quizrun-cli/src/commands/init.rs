//! The `quizrun init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizrun.toml").exists() {
        println!("quizrun.toml already exists, skipping.");
    } else {
        std::fs::write("quizrun.toml", SAMPLE_CONFIG)?;
        println!("Created quizrun.toml");
    }

    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.toml");
    if example_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizrun.toml (set server_url to submit to a quiz server)");
    println!("  2. Run: quizrun validate --quiz quizzes/example.toml");
    println!("  3. Run: quizrun take --quiz quizzes/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrun configuration

# Quiz API server. Leave unset to take quizzes from files and keep
# submissions in output_dir/outbox.
# server_url = "https://quiz.example.com/api"
# api_token = "${QUIZRUN_API_TOKEN}"

# student_id = "student-001"
request_timeout_secs = 30
pending_queue = "./quizrun-pending.json"
output_dir = "./quizrun-results"
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
id = "example"
title = "Example quiz"
time_limit_minutes = 10
target_score = 70

[[questions]]
id = "q1"
type = "multiple"
prompt = "Which planet is closest to the sun?"
options = ["Venus", "Mercury", "Mars"]
correct_answer = 1

[[questions]]
id = "q2"
type = "ox"
prompt = "Water boils at 100 degrees Celsius at sea level."
correct_answer = 1

[[questions]]
id = "q3"
type = "dictation"
prompt = "Spell the word for a baby cat."
points = 2
correct_answer = "kitten"
"#;
