pub mod loader;

use std::collections::BTreeMap;

use serde::Deserialize;

/// Read-side model of a SARIF 2.1.0 log.
///
/// Every field is optional or defaulted: a result missing `level`,
/// `locations`, or `message` must still deserialize (partial data is
/// recovered by the extractor, not rejected here). A document that is
/// valid JSON but does not fit this shape at all fails deserialization,
/// which the loader treats as "not a SARIF file".
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SarifLog {
    #[serde(default)]
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SarifRun {
    #[serde(default)]
    pub tool: Option<SarifTool>,
    #[serde(default)]
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SarifTool {
    #[serde(default)]
    pub driver: Option<SarifDriver>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SarifDriver {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rules: Vec<SarifRule>,
}

/// One entry of a run's rule catalog.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SarifRule {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub help_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub message: Option<SarifMessage>,
    #[serde(default)]
    pub locations: Vec<SarifLocation>,
    /// Tool-supplied stable identifiers; BTreeMap keeps key order
    /// deterministic for fingerprint keys.
    #[serde(default)]
    pub fingerprints: BTreeMap<String, String>,
    #[serde(default)]
    pub partial_fingerprints: BTreeMap<String, String>,
    #[serde(default)]
    pub correlation_guid: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SarifMessage {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SarifLocation {
    #[serde(default)]
    pub physical_location: Option<PhysicalLocation>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation {
    #[serde(default)]
    pub artifact_location: Option<ArtifactLocation>,
    #[serde(default)]
    pub region: Option<Region>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArtifactLocation {
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default)]
    pub start_line: Option<u32>,
    #[serde(default)]
    pub end_line: Option<u32>,
    #[serde(default)]
    pub start_column: Option<u32>,
    #[serde(default)]
    pub end_column: Option<u32>,
}
