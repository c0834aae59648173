use std::path::PathBuf;

use tracing::debug;

/// CI environment configuration, resolved once at startup.
///
/// Everything the pipeline needs from the process environment lives
/// here; the pipeline itself never reads env vars, so tests can build
/// a `CiContext` by hand.
#[derive(Debug, Clone)]
pub struct CiContext {
    /// Server base URL, e.g. "https://github.com" or a GHES host
    pub server_url: String,

    /// "owner/name" slug; empty when not running in CI
    pub repository: String,

    /// Commit SHA the run is for; empty when unknown
    pub sha: String,

    /// Absolute checkout path on the runner; empty when unknown
    pub workspace: String,

    /// Path to the CI event payload JSON, if any
    pub event_path: Option<PathBuf>,

    /// Path to the step-summary file to append digests to, if any
    pub step_summary: Option<PathBuf>,
}

impl Default for CiContext {
    fn default() -> Self {
        CiContext {
            server_url: "https://github.com".to_string(),
            repository: String::new(),
            sha: String::new(),
            workspace: String::new(),
            event_path: None,
            step_summary: None,
        }
    }
}

impl CiContext {
    pub fn from_env() -> Self {
        let ctx = CiContext {
            server_url: std::env::var("GITHUB_SERVER_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://github.com".to_string()),
            repository: std::env::var("GITHUB_REPOSITORY").unwrap_or_default(),
            sha: std::env::var("GITHUB_SHA").unwrap_or_default(),
            workspace: std::env::var("GITHUB_WORKSPACE").unwrap_or_default(),
            event_path: std::env::var("GITHUB_EVENT_PATH").ok().map(PathBuf::from),
            step_summary: std::env::var("GITHUB_STEP_SUMMARY")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        };
        debug!("CI context: {:?}", ctx);
        ctx
    }

    /// Repository name without the owner prefix ("octo/tool" → "tool").
    pub fn repo_name(&self) -> &str {
        self.repository
            .rsplit('/')
            .next()
            .unwrap_or(&self.repository)
    }

    /// Split the slug into (owner, name); None when unset or malformed.
    pub fn owner_repo(&self) -> Option<(&str, &str)> {
        let (owner, name) = self.repository.split_once('/')?;
        if owner.is_empty() || name.is_empty() {
            return None;
        }
        Some((owner, name))
    }

    /// REST API base for this server. github.com uses the dedicated
    /// api host; GHES serves the API under /api/v3.
    pub fn api_base(&self) -> String {
        let server = self.server_url.trim_end_matches('/');
        if server == "https://github.com" {
            "https://api.github.com".to_string()
        } else {
            format!("{}/api/v3", server)
        }
    }

    /// Deep link to a file (and line) at the current SHA. Empty when
    /// repository, sha, or path is unknown.
    pub fn blob_url(&self, path: &str, line: Option<u32>) -> String {
        if self.repository.is_empty() || self.sha.is_empty() || path.is_empty() {
            return String::new();
        }
        let server = self.server_url.trim_end_matches('/');
        let mut url = format!("{}/{}/blob/{}/{}", server, self.repository, self.sha, path);
        if let Some(line) = line {
            url.push_str(&format!("#L{}", line));
        }
        url
    }
}
