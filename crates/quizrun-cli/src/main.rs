//! The `quizrun` command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizrun", version, about = "Timed quiz attempts in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz interactively
    Take {
        /// Path to a .toml quiz file
        #[arg(long, conflicts_with = "quiz_id", required_unless_present = "quiz_id")]
        quiz: Option<PathBuf>,

        /// Quiz id to fetch from the configured server
        #[arg(long)]
        quiz_id: Option<String>,

        /// Student id attached to the submission
        #[arg(long)]
        student: Option<String>,

        /// Directory for the saved result (default: output_dir from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate quiz TOML files
    Validate {
        /// Path to quiz file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Show a saved result
    Show {
        /// Saved submission JSON
        #[arg(long)]
        result: PathBuf,
    },

    /// Resend submissions that could not be delivered
    Flush {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example quiz
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizrun=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            quiz,
            quiz_id,
            student,
            output,
            config,
        } => commands::take::execute(quiz, quiz_id, student, output, config).await,
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::Show { result } => commands::show::execute(result),
        Commands::Flush { config } => commands::flush::execute(config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
