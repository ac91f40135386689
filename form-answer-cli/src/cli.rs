use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "form-answer",
    about = "Answer dynamic forms and compare submitted answers",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// TOML file with the API settings (`base_url`, `token`, `timeout_secs`)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Use the built-in sample forms instead of a server
    #[arg(long, global = true)]
    pub demo: bool,

    /// Where log output goes; the terminal belongs to the screens
    #[arg(long, value_name = "PATH", global = true, default_value = "form-answer.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fill in and submit a pending answer
    Answer {
        /// Form being answered
        #[arg(long)]
        form: i64,
        /// Answer record to fill in
        #[arg(long)]
        answer: i64,
    },
    /// Show a submitted answer read-only
    View {
        answer: i64,
    },
    /// Pick up to two answers and show them side by side
    Compare {
        #[arg(required = true, num_args = 1..)]
        answers: Vec<i64>,
    },
}
