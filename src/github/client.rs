use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Comments are listed in pages of this size.
pub const PER_PAGE: usize = 100;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success status; the response body is kept verbatim so the
    /// remote diagnostic reaches the caller.
    #[error("GitHub API error: {status} {method} {url}\n{body}")]
    Status {
        status: u16,
        method: &'static str,
        url: String,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One issue comment, reduced to the fields the upserter needs.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
}

/// Issue-comment operations on one pull request. The upsert driver
/// only sees this trait, so tests swap in an in-memory double.
pub trait IssueComments {
    /// One page of comments, 1-based. A short page is the last page.
    fn list_page(&self, page: usize) -> Result<Vec<IssueComment>, ApiError>;

    fn create(&self, body: &str) -> Result<IssueComment, ApiError>;

    fn update(&self, comment_id: u64, body: &str) -> Result<IssueComment, ApiError>;
}

/// Blocking GitHub REST client scoped to one repository and PR.
pub struct GitHubClient {
    http: reqwest::blocking::Client,
    token: String,
    api_base: String,
    owner: String,
    repo: String,
    pr_number: u64,
}

impl GitHubClient {
    pub fn new(api_base: String, owner: String, repo: String, pr_number: u64, token: String) -> Self {
        GitHubClient {
            http: reqwest::blocking::Client::new(),
            token,
            api_base,
            owner,
            repo,
            pr_number,
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let method_name: &'static str = if method == reqwest::Method::POST {
            "POST"
        } else if method == reqwest::Method::PATCH {
            "PATCH"
        } else {
            "GET"
        };
        debug!("{} {}", method_name, url);

        let mut req = self
            .http
            .request(method, url)
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", format!("Bearer {}", self.token))
            .header("User-Agent", concat!("stepsum/", env!("CARGO_PKG_VERSION")))
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                method: method_name,
                url: url.to_string(),
                body,
            });
        }
        Ok(resp)
    }
}

impl IssueComments for GitHubClient {
    fn list_page(&self, page: usize) -> Result<Vec<IssueComment>, ApiError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments?per_page={}&page={}",
            self.api_base, self.owner, self.repo, self.pr_number, PER_PAGE, page
        );
        let resp = self.request(reqwest::Method::GET, &url, None)?;
        Ok(resp.json()?)
    }

    fn create(&self, body: &str) -> Result<IssueComment, ApiError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_base, self.owner, self.repo, self.pr_number
        );
        let payload = serde_json::json!({ "body": body });
        let resp = self.request(reqwest::Method::POST, &url, Some(&payload))?;
        Ok(resp.json()?)
    }

    fn update(&self, comment_id: u64, body: &str) -> Result<IssueComment, ApiError> {
        let url = format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.api_base, self.owner, self.repo, comment_id
        );
        let payload = serde_json::json!({ "body": body });
        let resp = self.request(reqwest::Method::PATCH, &url, Some(&payload))?;
        Ok(resp.json()?)
    }
}
