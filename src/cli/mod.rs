pub mod commands;

use clap::Parser;

pub use commands::{Commands, CommentArgs, ReportArgs};

/// stepsum — CI step-summary toolkit
///
/// Aggregates SARIF scanner output into an HTML report plus a short
/// digest, and keeps a named, updatable comment on the pull request.
#[derive(Parser, Debug)]
#[command(
    name = "stepsum",
    version,
    about = "CI step-summary toolkit — SARIF reports and managed PR comments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
