use std::collections::BTreeMap;

use crate::report::finding::{Finding, Level, LevelCounts};

/// Escape a string for embedding in HTML text or attribute position.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the findings as an HTML fragment.
///
/// Summary-safe: no document-level tags, no style or head, so the
/// output can be dropped straight into a GitHub step summary or a PR
/// comment body. Output is a pure function of (findings, title) —
/// byte-identical across runs for the same input.
pub fn render_fragment(findings: &[Finding], title: &str) -> String {
    let counts = LevelCounts::from_findings(findings);

    // tool → findings, tools sorted for deterministic section order
    let mut grouped: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
    for f in findings {
        grouped.entry(f.tool.as_str()).or_default().push(f);
    }

    let mut out: Vec<String> = Vec::new();
    out.push(format!("<h2>{}</h2>", escape(title)));
    out.push(format!(
        "<p>{} {} {} {} {} {} Total: {}</p>",
        Level::Error.emoji(),
        counts.error,
        Level::Warning.emoji(),
        counts.warning,
        Level::Note.emoji(),
        counts.note,
        counts.total(),
    ));

    for (tool, tool_findings) in &grouped {
        let mut tool_counts = LevelCounts::default();
        for f in tool_findings {
            tool_counts.add(f.level);
        }
        out.push("<details open>".to_string());
        out.push(format!(
            "<summary>🧰 <b>{}</b> — {} {} {} {} {} {}</summary>",
            escape(tool),
            Level::Error.emoji(),
            tool_counts.error,
            Level::Warning.emoji(),
            tool_counts.warning,
            Level::Note.emoji(),
            tool_counts.note,
        ));

        for level in Level::ORDER {
            let items: Vec<&&Finding> =
                tool_findings.iter().filter(|f| f.level == level).collect();
            if items.is_empty() {
                continue;
            }

            out.push("<details>".to_string());
            out.push(format!(
                "<summary>{} {} ({})</summary>",
                level.emoji(),
                level.label(),
                items.len()
            ));
            out.push("<table>".to_string());
            out.push(
                "<tr><th>Rule</th><th>Location</th><th>Link</th><th>Message</th></tr>".to_string(),
            );

            for f in items {
                let loc = match f.line {
                    Some(line) => escape(&format!("{}:{}", f.path, line)),
                    None => escape(&f.path),
                };
                let link = if f.link.is_empty() {
                    String::new()
                } else {
                    format!("<a href=\"{}\">🔗</a>", escape(&f.link))
                };
                let help = if f.help.is_empty() {
                    String::new()
                } else {
                    format!(" <a href=\"{}\">docs</a>", escape(&f.help))
                };
                out.push(format!(
                    "<tr><td><code>{}</code>{}</td><td>{}<br><small>{}</small></td><td>{}</td><td>{}</td></tr>",
                    escape(&f.rule),
                    help,
                    loc,
                    escape(&f.region),
                    link,
                    escape(&f.message),
                ));
            }

            out.push("</table></details>".to_string());
        }
        out.push("</details>".to_string());
    }

    out.join("\n")
}

/// Render the same report as a standalone HTML document.
pub fn render_document(findings: &[Finding], title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        render_fragment(findings, title)
    )
}
