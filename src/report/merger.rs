use std::collections::HashSet;

use tracing::debug;

use crate::report::finding::Finding;

/// Collapse findings sharing a dedupe signature, keeping the first
/// occurrence. Source order is preserved, which makes this idempotent.
pub fn dedupe_findings(mut findings: Vec<Finding>) -> Vec<Finding> {
    let before = findings.len();

    let mut seen = HashSet::new();
    findings.retain(|f| seen.insert(f.dedupe_key.clone()));

    if findings.len() < before {
        debug!("Deduplicated {} of {} findings", before - findings.len(), before);
    }
    findings
}
