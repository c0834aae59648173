use std::collections::BTreeMap;

use crate::config::CiContext;
use crate::report::finding::{Finding, Level};
use crate::sarif::{SarifLog, SarifResult, SarifRun};

/// Flatten a parsed SARIF document into findings, one per
/// (run, result) pair, preserving source order.
pub fn rows_from_sarif(log: &SarifLog, ctx: &CiContext) -> Vec<Finding> {
    let mut rows = Vec::new();

    for run in &log.runs {
        let tool = tool_name(run);
        for result in &run.results {
            let level = Level::from_sarif(result.level.as_deref());
            let rule = result.rule_id.clone().unwrap_or_default();
            let message = message_text(result);

            let (path, line, region) = first_location(result, ctx);
            let help = rule_help(run, &rule);
            let link = ctx.blob_url(&path, line);

            let fp = best_fingerprint(result);
            let dedupe_key = if fp.is_empty() {
                format!(
                    "{}|{}|{}|{}|{}",
                    tool,
                    rule,
                    path,
                    line.map(|l| l.to_string()).unwrap_or_default(),
                    level
                )
            } else {
                // Tool-supplied fingerprints are authoritative: level is
                // deliberately not part of this key.
                format!("{}|{}|{}", tool, rule, fp)
            };

            rows.push(Finding {
                tool: tool.clone(),
                level,
                rule,
                message,
                path,
                line,
                region,
                help,
                link,
                dedupe_key,
            });
        }
    }

    rows
}

fn tool_name(run: &SarifRun) -> String {
    run.tool
        .as_ref()
        .and_then(|t| t.driver.as_ref())
        .and_then(|d| d.name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "tool".to_string())
}

fn rule_help(run: &SarifRun, rule_id: &str) -> String {
    if rule_id.is_empty() {
        return String::new();
    }
    let rules = match run.tool.as_ref().and_then(|t| t.driver.as_ref()) {
        Some(driver) => &driver.rules,
        None => return String::new(),
    };
    rules
        .iter()
        .find(|r| r.id.as_deref() == Some(rule_id))
        .and_then(|r| r.help_uri.clone())
        .unwrap_or_default()
}

fn message_text(result: &SarifResult) -> String {
    result
        .message
        .as_ref()
        .and_then(|m| m.text.as_deref())
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Fingerprint priority: correlation guid, then the first non-empty of
/// fingerprints / partialFingerprints as sorted "k=v" pairs. Empty
/// string means "no fingerprint, use the fallback key".
fn best_fingerprint(result: &SarifResult) -> String {
    if let Some(guid) = result.correlation_guid.as_deref().filter(|g| !g.is_empty()) {
        return format!("cg:{}", guid);
    }

    let kinds: [(&str, &BTreeMap<String, String>); 2] = [
        ("fingerprints", &result.fingerprints),
        ("partialFingerprints", &result.partial_fingerprints),
    ];
    for (kind, map) in kinds {
        if !map.is_empty() {
            let items = map
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("|");
            return format!("{}:{}", kind, items);
        }
    }

    String::new()
}

/// Extract (path, line, region) from the first location entry.
///
/// Only the first location is used; results carrying several locations
/// lose the rest. That is a deliberate simplification: CI summaries
/// point at one place per finding.
fn first_location(result: &SarifResult, ctx: &CiContext) -> (String, Option<u32>, String) {
    let physical = match result
        .locations
        .first()
        .and_then(|l| l.physical_location.as_ref())
    {
        Some(p) => p,
        None => return (String::new(), None, String::new()),
    };

    let uri = physical
        .artifact_location
        .as_ref()
        .and_then(|a| a.uri.as_deref())
        .unwrap_or_default();
    let path = normalize_artifact_uri(uri, ctx);

    let (line, region) = match physical.region.as_ref() {
        Some(region) => (region.start_line, region_text(region)),
        None => (None, String::new()),
    };

    (path, line, region)
}

/// Human line/column range: "L12", "L12-L15", optionally followed by
/// " C3" or " C3-C9". No start line means no region text at all.
fn region_text(region: &crate::sarif::Region) -> String {
    let start = match region.start_line {
        Some(start) => start,
        None => return String::new(),
    };

    let mut out = match region.end_line {
        Some(end) if end != start => format!("L{}-L{}", start, end),
        _ => format!("L{}", start),
    };

    if let Some(col) = region.start_column {
        match region.end_column {
            Some(end) if end != col => out.push_str(&format!(" C{}-C{}", col, end)),
            _ => out.push_str(&format!(" C{}", col)),
        }
    }

    out
}

/// Strip runner prefixes from an artifact URI and return a
/// repo-relative path.
///
/// Handles file:// URIs, backslash separators, absolute workspace
/// paths, and paths that embed the checkout under ".../<repo>/...".
pub fn normalize_artifact_uri(uri: &str, ctx: &CiContext) -> String {
    if uri.is_empty() {
        return String::new();
    }

    let uri = uri.strip_prefix("file://").unwrap_or(uri).replace('\\', "/");
    let mut uri = uri.as_str();

    let workspace = ctx.workspace.replace('\\', "/");
    let workspace = workspace.trim_end_matches('/');
    if !workspace.is_empty() {
        if let Some(rest) = uri.strip_prefix(workspace).and_then(|r| r.strip_prefix('/')) {
            uri = rest;
        }
    }

    let repo = ctx.repo_name();
    if !repo.is_empty() {
        let marker = format!("/{}/", repo);
        if let Some(idx) = uri.find(&marker) {
            uri = &uri[idx + marker.len()..];
        }
    }

    uri.trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sarif::Region;

    fn parse(json: &str) -> SarifLog {
        serde_json::from_str(json).unwrap()
    }

    fn ctx() -> CiContext {
        CiContext {
            repository: "octo/tool".to_string(),
            workspace: "/home/runner/work/tool/tool".to_string(),
            ..CiContext::default()
        }
    }

    fn region(sl: Option<u32>, el: Option<u32>, sc: Option<u32>, ec: Option<u32>) -> Region {
        Region {
            start_line: sl,
            end_line: el,
            start_column: sc,
            end_column: ec,
        }
    }

    #[test]
    fn one_finding_per_result_in_source_order() {
        let log = parse(
            r#"{"runs":[
                {"tool":{"driver":{"name":"alpha"}},
                 "results":[{"ruleId":"A1"},{"ruleId":"A2"}]},
                {"tool":{"driver":{"name":"beta"}},
                 "results":[{"ruleId":"B1"}]}
            ]}"#,
        );
        let rows = rows_from_sarif(&log, &ctx());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].rule, "A1");
        assert_eq!(rows[1].rule, "A2");
        assert_eq!(rows[2].tool, "beta");
    }

    #[test]
    fn missing_driver_name_falls_back_to_tool() {
        let log = parse(r#"{"runs":[{"results":[{}]}]}"#);
        let rows = rows_from_sarif(&log, &ctx());
        assert_eq!(rows[0].tool, "tool");
        assert_eq!(rows[0].level, Level::Warning);
    }

    #[test]
    fn result_without_locations_has_empty_location_fields() {
        let log = parse(r#"{"runs":[{"results":[{"level":"error"}]}]}"#);
        let rows = rows_from_sarif(&log, &ctx());
        assert_eq!(rows[0].path, "");
        assert_eq!(rows[0].line, None);
        assert_eq!(rows[0].region, "");
        assert_eq!(rows[0].link, "");
    }

    #[test]
    fn only_first_location_is_used() {
        let log = parse(
            r#"{"runs":[{"results":[{"locations":[
                {"physicalLocation":{"artifactLocation":{"uri":"a.rs"},"region":{"startLine":1}}},
                {"physicalLocation":{"artifactLocation":{"uri":"b.rs"},"region":{"startLine":9}}}
            ]}]}]}"#,
        );
        let rows = rows_from_sarif(&log, &ctx());
        assert_eq!(rows[0].path, "a.rs");
        assert_eq!(rows[0].line, Some(1));
    }

    #[test]
    fn region_line_and_column_formatting() {
        assert_eq!(region_text(&region(Some(12), None, None, None)), "L12");
        assert_eq!(region_text(&region(Some(12), Some(12), None, None)), "L12");
        assert_eq!(region_text(&region(Some(12), Some(15), None, None)), "L12-L15");
        assert_eq!(
            region_text(&region(Some(12), Some(15), Some(3), Some(9))),
            "L12-L15 C3-C9"
        );
        assert_eq!(
            region_text(&region(Some(12), None, Some(3), Some(3))),
            "L12 C3"
        );
        assert_eq!(region_text(&region(None, Some(5), Some(3), None)), "");
    }

    #[test]
    fn help_uri_resolved_from_rule_catalog() {
        let log = parse(
            r#"{"runs":[{
                "tool":{"driver":{"name":"alpha","rules":[
                    {"id":"A1","helpUri":"https://docs/a1"},
                    {"id":"A2"}
                ]}},
                "results":[{"ruleId":"A1"},{"ruleId":"A2"},{"ruleId":"A3"},{}]
            }]}"#,
        );
        let rows = rows_from_sarif(&log, &ctx());
        assert_eq!(rows[0].help, "https://docs/a1");
        assert_eq!(rows[1].help, "");
        assert_eq!(rows[2].help, "");
        assert_eq!(rows[3].help, "");
    }

    #[test]
    fn fingerprint_priority_correlation_beats_fingerprints() {
        let log = parse(
            r#"{"runs":[{"results":[{
                "correlationGuid":"g-1",
                "fingerprints":{"x":"1"},
                "partialFingerprints":{"y":"2"}
            }]}]}"#,
        );
        let rows = rows_from_sarif(&log, &ctx());
        assert!(rows[0].dedupe_key.ends_with("cg:g-1"));
    }

    #[test]
    fn fingerprint_pairs_are_sorted_and_prefixed_by_kind() {
        let log = parse(
            r#"{"runs":[{"results":[
                {"fingerprints":{"b":"2","a":"1"}},
                {"partialFingerprints":{"p":"3"}}
            ]}]}"#,
        );
        let rows = rows_from_sarif(&log, &ctx());
        assert!(rows[0].dedupe_key.ends_with("fingerprints:a=1|b=2"));
        assert!(rows[1].dedupe_key.ends_with("partialFingerprints:p=3"));
    }

    #[test]
    fn fallback_key_includes_level_fingerprint_key_does_not() {
        let log = parse(
            r#"{"runs":[{"tool":{"driver":{"name":"alpha"}},"results":[
                {"ruleId":"R","level":"error","fingerprints":{"x":"1"}},
                {"ruleId":"R","level":"warning","fingerprints":{"x":"1"}},
                {"ruleId":"R","level":"error"},
                {"ruleId":"R","level":"warning"}
            ]}]}"#,
        );
        let rows = rows_from_sarif(&log, &ctx());
        assert_eq!(rows[0].dedupe_key, rows[1].dedupe_key);
        assert_ne!(rows[2].dedupe_key, rows[3].dedupe_key);
    }

    #[test]
    fn artifact_uri_normalization() {
        let c = ctx();
        assert_eq!(
            normalize_artifact_uri("file:///home/runner/work/tool/tool/src/a.rs", &c),
            "src/a.rs"
        );
        assert_eq!(
            normalize_artifact_uri("/home/runner/work/tool/tool/src/a.rs", &c),
            "src/a.rs"
        );
        assert_eq!(normalize_artifact_uri("src\\a.rs", &c), "src/a.rs");
        assert_eq!(normalize_artifact_uri("src/a.rs", &c), "src/a.rs");
        assert_eq!(normalize_artifact_uri("", &c), "");
    }

    #[test]
    fn uri_normalization_without_ci_context() {
        let c = CiContext::default();
        assert_eq!(normalize_artifact_uri("/abs/path/a.rs", &c), "abs/path/a.rs");
    }
}
