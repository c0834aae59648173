use std::collections::HashMap;

use owo_colors::OwoColorize;

use crate::report::finding::{Finding, Level, LevelCounts};

/// How many rule ids the top-rules block lists.
const TOP_RULES: usize = 3;

/// Render the fixed-format text digest appended to the CI step
/// summary. Counts always agree with the HTML report header.
pub fn render(findings: &[Finding], title: &str) -> String {
    let counts = LevelCounts::from_findings(findings);

    let mut out = String::new();
    out.push_str(&format!("### {}\n", title));
    out.push_str(&format!(
        "{} {} errors · {} {} warnings · {} {} notes · {} {} none · {} total\n",
        Level::Error.emoji(),
        counts.error,
        Level::Warning.emoji(),
        counts.warning,
        Level::Note.emoji(),
        counts.note,
        Level::None.emoji(),
        counts.none,
        counts.total(),
    ));

    let top = top_rules(findings);
    if !top.is_empty() {
        let listed: Vec<String> = top
            .iter()
            .map(|(rule, n)| format!("{} ×{}", rule, n))
            .collect();
        out.push_str(&format!("Top rules: {}\n", listed.join(", ")));
    }

    out
}

/// Most frequent non-empty rule ids, descending by count, ties broken
/// by rule id.
fn top_rules(findings: &[Finding]) -> Vec<(String, usize)> {
    let mut by_rule: HashMap<&str, usize> = HashMap::new();
    for f in findings {
        if !f.rule.is_empty() {
            *by_rule.entry(f.rule.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = by_rule
        .into_iter()
        .map(|(rule, n)| (rule.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_RULES);
    ranked
}

/// Print a one-glance summary to the terminal after a report run.
pub fn print_console(findings: &[Finding], title: &str) {
    let counts = LevelCounts::from_findings(findings);

    println!();
    if counts.total() == 0 {
        println!("  {}  {} — no findings", "✅".bold(), title);
        println!();
        return;
    }

    let mut parts = Vec::new();
    if counts.error > 0 {
        parts.push(format!("{} errors", counts.error).red().bold().to_string());
    }
    if counts.warning > 0 {
        parts.push(format!("{} warnings", counts.warning).yellow().to_string());
    }
    if counts.note > 0 {
        parts.push(format!("{} notes", counts.note).blue().to_string());
    }
    if counts.none > 0 {
        parts.push(format!("{} unleveled", counts.none).dimmed().to_string());
    }

    println!(
        "  {}  {} — {} ({} total)",
        "📋".bold(),
        title,
        parts.join(", "),
        counts.total()
    );
    println!();
}
