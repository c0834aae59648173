//! End-to-end pipeline tests: glob → load → dedupe → render.

use std::path::Path;

use stepsum::config::CiContext;
use stepsum::report::finding::{Level, LevelCounts};
use stepsum::report::{digest, html, merger};
use stepsum::sarif::loader;

fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

fn sarif_with_fingerprint(tool: &str, rule: &str, level: &str) -> String {
    format!(
        r#"{{"runs":[{{
            "tool":{{"driver":{{"name":"{tool}"}}}},
            "results":[{{
                "ruleId":"{rule}",
                "level":"{level}",
                "message":{{"text":"something is off"}},
                "fingerprints":{{"x":"1"}}
            }}]
        }}]}}"#
    )
}

#[test]
fn fingerprint_dedup_ignores_level_and_keeps_first() {
    let dir = tempfile::tempdir().unwrap();
    // a.sarif sorts before b.sarif, so the error-level copy is first
    write(dir.path(), "a.sarif", &sarif_with_fingerprint("scanner", "R1", "error"));
    write(dir.path(), "b.sarif", &sarif_with_fingerprint("scanner", "R1", "warning"));

    let glob = format!("{}/*.sarif", dir.path().display());
    let rows = loader::load_findings(&glob, &CiContext::default()).unwrap();
    assert_eq!(rows.len(), 2);

    let deduped = merger::dedupe_findings(rows);
    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped[0].level, Level::Error);
}

#[test]
fn extraction_preserves_result_count_and_dedup_never_grows() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "multi.sarif",
        r#"{"runs":[
            {"tool":{"driver":{"name":"alpha"}},
             "results":[
                {"ruleId":"A","level":"error","locations":[{"physicalLocation":{"artifactLocation":{"uri":"src/a.rs"},"region":{"startLine":3}}}]},
                {"ruleId":"A","level":"error","locations":[{"physicalLocation":{"artifactLocation":{"uri":"src/a.rs"},"region":{"startLine":3}}}]},
                {"ruleId":"B","level":"info"}
             ]},
            {"tool":{"driver":{"name":"beta"}},
             "results":[{"ruleId":"C"}]}
        ]}"#,
    );

    let glob = format!("{}/*.sarif", dir.path().display());
    let rows = loader::load_findings(&glob, &CiContext::default()).unwrap();
    assert_eq!(rows.len(), 4);

    let deduped = merger::dedupe_findings(rows.clone());
    assert!(deduped.len() <= rows.len());
    assert_eq!(deduped.len(), 3);

    // idempotent
    assert_eq!(merger::dedupe_findings(deduped.clone()), deduped);

    // per-tool, per-severity counts sum to the grand total
    let counts = LevelCounts::from_findings(&deduped);
    assert_eq!(counts.error, 1);
    assert_eq!(counts.warning, 1); // absent level defaults to warning
    assert_eq!(counts.note, 1); // "info" normalizes to note
    assert_eq!(counts.total(), deduped.len());

    let report = html::render_fragment(&deduped, "CI Report");
    assert!(report.contains("Total: 3"));
    let summary = digest::render(&deduped, "CI Report");
    assert!(summary.contains("3 total"));
}

#[test]
fn result_without_locations_flows_through_the_whole_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "bare.sarif",
        r#"{"runs":[{"results":[{"level":"error","message":{"text":"  detached finding  "}}]}]}"#,
    );

    let glob = format!("{}/*.sarif", dir.path().display());
    let rows = loader::load_findings(&glob, &CiContext::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].tool, "tool");
    assert_eq!(rows[0].path, "");
    assert_eq!(rows[0].line, None);
    assert_eq!(rows[0].region, "");
    assert_eq!(rows[0].message, "detached finding");

    let report = html::render_fragment(&merger::dedupe_findings(rows), "CI Report");
    assert!(report.contains("detached finding"));
}

#[test]
fn non_sarif_json_is_skipped_but_invalid_json_aborts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "ok.sarif", &sarif_with_fingerprint("scanner", "R1", "error"));
    write(dir.path(), "shape.sarif", r#"{"runs":"not-a-list"}"#);

    let glob = format!("{}/*.sarif", dir.path().display());
    let rows = loader::load_findings(&glob, &CiContext::default()).unwrap();
    assert_eq!(rows.len(), 1, "non-SARIF shape contributes zero findings");

    write(dir.path(), "broken.sarif", "{ not json");
    assert!(loader::load_findings(&glob, &CiContext::default()).is_err());
}

#[test]
fn empty_glob_produces_an_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let glob = format!("{}/*.sarif", dir.path().display());
    let rows = loader::load_findings(&glob, &CiContext::default()).unwrap();
    assert!(rows.is_empty());

    let report = html::render_fragment(&rows, "CI Report");
    assert!(report.contains("Total: 0"));
}

#[test]
fn workspace_paths_and_links_resolve_from_ci_context() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "loc.sarif",
        r#"{"runs":[{"tool":{"driver":{"name":"alpha"}},"results":[{
            "ruleId":"A",
            "level":"error",
            "locations":[{"physicalLocation":{
                "artifactLocation":{"uri":"file:///home/runner/work/tool/tool/src/lib.rs"},
                "region":{"startLine":12,"endLine":15,"startColumn":3,"endColumn":9}
            }}]
        }]}]}"#,
    );

    let ctx = CiContext {
        repository: "octo/tool".to_string(),
        sha: "deadbeef".to_string(),
        workspace: "/home/runner/work/tool/tool".to_string(),
        ..CiContext::default()
    };

    let glob = format!("{}/*.sarif", dir.path().display());
    let rows = loader::load_findings(&glob, &ctx).unwrap();
    assert_eq!(rows[0].path, "src/lib.rs");
    assert_eq!(rows[0].line, Some(12));
    assert_eq!(rows[0].region, "L12-L15 C3-C9");
    assert_eq!(
        rows[0].link,
        "https://github.com/octo/tool/blob/deadbeef/src/lib.rs#L12"
    );
}
