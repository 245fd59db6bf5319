//! Command-line interface for the quiz bank.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use services::DEFAULT_SESSION_SIZE;

/// Build multiple-choice question banks and practice with them.
#[derive(Parser, Debug, Clone)]
#[command(name = "quiz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database URL or path; created on first use
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite:quiz.sqlite3")]
    pub db_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List sets with their question counts
    Sets,

    /// List every tag used in the bank
    Tags,

    /// Create an empty set
    AddSet {
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Add a question to a set
    AddQuestion {
        /// Set name or id
        #[arg(short, long)]
        set: String,

        #[arg(short, long)]
        prompt: String,

        /// Answer option; repeat for each option, blanks are ignored
        #[arg(short = 'o', long = "option", required = true)]
        options: Vec<String>,

        /// Position of the correct option among those given, starting at 1
        #[arg(short, long)]
        correct: usize,

        #[arg(short, long)]
        explanation: Option<String>,

        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
    },

    /// Delete a set and all of its questions
    RemoveSet {
        /// Set name or id
        set: String,
    },

    /// Write the whole bank to a JSON document
    Export {
        /// Output path; defaults to quiz_bank_<date>.json in the current directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Merge a JSON document into the bank
    Import { file: PathBuf },

    /// Run a practice session in the terminal
    Practice {
        /// Only draw from these sets (name or id); repeatable
        #[arg(short, long = "set")]
        sets: Vec<String>,

        /// Only draw questions carrying any of these tags; repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Number of questions to draw
        #[arg(short = 'n', long, env = "QUIZ_SESSION_SIZE", default_value_t = DEFAULT_SESSION_SIZE)]
        count: usize,

        /// Seed for a reproducible draw
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Import the bundled demo sets
    Seed,

    /// Delete every set
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}
