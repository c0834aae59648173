use anyhow::{Context, Result};
use tracing::debug;

use crate::config::CiContext;
use crate::github::client::{ApiError, IssueComment, IssueComments, PER_PAGE};

const MARKER_PREFIX: &str = "<!-- pr-comment:";
const MARKER_SUFFIX: &str = " -->";

/// How the upserter treats an existing managed comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Patch the existing comment, else create one
    Upsert,
    /// Patch the existing comment; succeed without writing if none
    Update,
    /// Always post a new comment
    Create,
}

/// What the upsert actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created(u64),
    Updated(u64),
    /// mode=update with no existing managed comment: success, no writes
    Skipped,
}

/// Hidden marker identifying the managed comment named `name`.
pub fn marker_for(name: &str) -> String {
    format!("{}{}{}", MARKER_PREFIX, name, MARKER_SUFFIX)
}

/// Final comment body: marker first so lookup stays reliable.
pub fn build_body(name: &str, content: &str) -> String {
    format!("{}\n{}\n", marker_for(name), content)
}

/// PR number from the CI event payload, when the event carries one.
pub fn derive_pr_number(ctx: &CiContext) -> Result<Option<u64>> {
    let path = match ctx.event_path.as_ref().filter(|p| p.exists()) {
        Some(path) => path,
        None => return Ok(None),
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event payload {}", path.display()))?;
    let event: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("event payload {} is not valid JSON", path.display()))?;

    Ok(event
        .get("pull_request")
        .and_then(|pr| pr.get("number"))
        .and_then(|n| n.as_u64()))
}

/// Scan all pages of PR comments for the marked one.
fn find_existing(
    api: &dyn IssueComments,
    marker: &str,
) -> Result<Option<IssueComment>, ApiError> {
    let mut page = 1;
    loop {
        let comments = api.list_page(page)?;
        let count = comments.len();
        if let Some(found) = comments.into_iter().find(|c| c.body.contains(marker)) {
            return Ok(Some(found));
        }
        if count < PER_PAGE {
            return Ok(None);
        }
        page += 1;
    }
}

/// Post or update the managed comment `name` on the target PR.
pub fn upsert_comment(
    api: &dyn IssueComments,
    name: &str,
    content: &str,
    mode: Mode,
) -> Result<Outcome> {
    let content = content.trim();
    anyhow::ensure!(!content.is_empty(), "empty comment body (provide --body or --body-file)");

    let body = build_body(name, content);

    if mode == Mode::Create {
        let created = api.create(&body)?;
        return Ok(Outcome::Created(created.id));
    }

    let marker = marker_for(name);
    match find_existing(api, &marker)? {
        Some(existing) => {
            let updated = api.update(existing.id, &body)?;
            Ok(Outcome::Updated(updated.id))
        }
        None if mode == Mode::Update => {
            debug!("No existing comment named '{}'; mode=update, nothing to do", name);
            Ok(Outcome::Skipped)
        }
        None => {
            let created = api.create(&body)?;
            Ok(Outcome::Created(created.id))
        }
    }
}
