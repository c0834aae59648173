use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::config::CiContext;
use crate::report::extract;
use crate::report::finding::Finding;
use crate::sarif::SarifLog;

/// Expand the input glob and extract findings from every matching
/// SARIF file.
///
/// Failure tiers: an unreadable file or invalid JSON aborts the whole
/// invocation; valid JSON that is not SARIF-shaped (missing `runs`,
/// `results` not a list) is logged and contributes zero findings.
pub fn load_findings(pattern: &str, ctx: &CiContext) -> Result<Vec<Finding>> {
    let files = matching_files(pattern)?;
    debug!("Glob '{}' matched {} file(s)", pattern, files.len());

    let mut findings = Vec::new();
    for path in &files {
        findings.extend(load_file(path, ctx)?);
    }
    Ok(findings)
}

/// Extract findings from one SARIF file.
pub fn load_file(path: &Path, ctx: &CiContext) -> Result<Vec<Finding>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let log: SarifLog = match serde_json::from_value(value) {
        Ok(log) => log,
        Err(e) => {
            warn!("Skipping {}: not a SARIF document ({})", path.display(), e);
            return Ok(Vec::new());
        }
    };

    let rows = extract::rows_from_sarif(&log, ctx);
    debug!("{}: {} finding(s)", path.display(), rows.len());
    Ok(rows)
}

/// Files matching the glob, sorted for deterministic report output.
fn matching_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let set = build_glob(pattern)?;
    let root = walk_root(pattern);

    let mut files = Vec::new();
    let walker = WalkBuilder::new(&root)
        // CI artifact directories are usually gitignored; walk them anyway.
        .standard_filters(false)
        .follow_links(false)
        .build();

    for entry in walker {
        match entry {
            Ok(entry) => {
                if !entry.file_type().map_or(false, |ft| ft.is_file()) {
                    continue;
                }
                let path = entry.path();
                // walking "." yields "./x" paths; match without the prefix
                let candidate = path.strip_prefix("./").unwrap_or(path);
                if set.is_match(candidate) {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => {
                debug!("Walk error: {}", e);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn build_glob(pattern: &str) -> Result<GlobSet> {
    let glob = Glob::new(pattern).with_context(|| format!("invalid glob '{}'", pattern))?;
    let mut builder = GlobSetBuilder::new();
    builder.add(glob);
    builder.build().context("failed to build glob matcher")
}

/// Directory to start walking from: the literal path prefix of the
/// pattern, up to its last separator before any glob metacharacter.
fn walk_root(pattern: &str) -> PathBuf {
    let meta = pattern.find(|c| matches!(c, '*' | '?' | '[' | '{'));
    let literal = match meta {
        Some(idx) => &pattern[..idx],
        None => pattern,
    };
    match literal.rfind('/') {
        Some(idx) if idx > 0 => PathBuf::from(&literal[..idx]),
        Some(_) => PathBuf::from("/"),
        None => PathBuf::from("."),
    }
}
