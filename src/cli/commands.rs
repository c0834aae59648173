use clap::Subcommand;
use std::path::PathBuf;

use crate::github::comment::Mode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate SARIF files into an HTML report and a step-summary digest
    Report(ReportArgs),

    /// Create or update a managed comment on the current pull request
    Comment(CommentArgs),
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Report title
    #[arg(long, default_value = "Security Report")]
    pub title: String,

    /// Output path for the HTML report (parent dirs created as needed)
    #[arg(short, long, default_value = "out/security-report.html")]
    pub out: PathBuf,

    /// Glob of SARIF files to aggregate
    #[arg(short, long, default_value = "sarif/**/*.sarif")]
    pub glob: String,

    /// Emit a standalone HTML document instead of a summary-safe fragment
    #[arg(long)]
    pub standalone: bool,
}

#[derive(clap::Args, Debug)]
pub struct CommentArgs {
    /// Name identifying the managed comment (embedded in a hidden marker)
    #[arg(long)]
    pub name: String,

    /// Literal comment body
    #[arg(long, default_value = "")]
    pub body: String,

    /// Read the comment body from a file (takes precedence over --body)
    #[arg(long)]
    pub body_file: Option<PathBuf>,

    /// Pull request number; derived from the CI event payload when omitted
    #[arg(long)]
    pub pr_number: Option<u64>,

    /// What to do when a managed comment already exists
    #[arg(long, value_enum, default_value_t = Mode::Upsert)]
    pub mode: Mode,

    /// GitHub access token; falls back to $GITHUB_TOKEN
    #[arg(long)]
    pub token: Option<String>,
}
