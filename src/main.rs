use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stepsum::cli::{self, Cli, CommentArgs, ReportArgs};
use stepsum::config::CiContext;
use stepsum::github::client::GitHubClient;
use stepsum::github::comment::{self, Outcome};
use stepsum::{report, sarif};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("stepsum=debug")
    } else if cli.quiet {
        EnvFilter::new("stepsum=error")
    } else {
        EnvFilter::new("stepsum=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let ctx = CiContext::from_env();

    match &cli.command {
        cli::Commands::Report(args) => run_report(args, &ctx, cli.quiet),
        cli::Commands::Comment(args) => run_comment(args, &ctx),
    }
}

fn run_report(args: &ReportArgs, ctx: &CiContext, quiet: bool) -> Result<()> {
    let rows = sarif::loader::load_findings(&args.glob, ctx)?;
    let total_extracted = rows.len();
    let findings = report::merger::dedupe_findings(rows);
    info!(
        "{} finding(s) after dedup ({} extracted)",
        findings.len(),
        total_extracted
    );

    let html = if args.standalone {
        report::html::render_document(&findings, &args.title)
    } else {
        report::html::render_fragment(&findings, &args.title)
    };

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&args.out, &html)
        .with_context(|| format!("failed to write {}", args.out.display()))?;
    info!("Report written to {}", args.out.display());

    let digest = report::digest::render(&findings, &args.title);
    if let Some(summary_path) = &ctx.step_summary {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(summary_path)
            .with_context(|| format!("failed to open {}", summary_path.display()))?;
        writeln!(file, "{}", digest)?;
        info!("Digest appended to {}", summary_path.display());
    }

    if !quiet {
        report::digest::print_console(&findings, &args.title);
    }

    Ok(())
}

fn run_comment(args: &CommentArgs, ctx: &CiContext) -> Result<()> {
    let content = match &args.body_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read body file {}", path.display()))?,
        None => args.body.clone(),
    };

    let pr_number = match args.pr_number {
        Some(n) => n,
        None => comment::derive_pr_number(ctx)?.context(
            "could not determine PR number; pass --pr-number or run on a pull_request event",
        )?,
    };

    let (owner, repo) = ctx
        .owner_repo()
        .context("GITHUB_REPOSITORY not set or invalid")?;

    let token = args
        .token
        .clone()
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .filter(|t| !t.is_empty())
        .context("no access token; pass --token or set GITHUB_TOKEN")?;

    let client = GitHubClient::new(
        ctx.api_base(),
        owner.to_string(),
        repo.to_string(),
        pr_number,
        token,
    );

    match comment::upsert_comment(&client, &args.name, &content, args.mode)? {
        Outcome::Created(id) => info!("Created comment id={} on PR #{}", id, pr_number),
        Outcome::Updated(id) => info!("Updated comment id={} on PR #{}", id, pr_number),
        Outcome::Skipped => info!("No existing comment named '{}'; nothing to do", args.name),
    }

    Ok(())
}
