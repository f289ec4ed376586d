//! Seams of the pipeline: the hosted repository API and the summarizer.
//!
//! Both traits are annotated for `mockall`, so the pipeline can be driven
//! deterministically in tests without network access or a local LLM CLI.
//! Mocks are exported behind the default `test-export-mocks` feature so
//! integration tests under `tests/` can use them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Raw language name → byte count, as reported by the hosted API.
pub type LanguageBytes = BTreeMap<String, u64>;

/// Owner of a repository in the listing response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// The subset of a repository listing entry the pipeline consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRepo {
    pub name: String,
    #[serde(default)]
    pub owner: Owner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

impl RawRepo {
    /// Description with `null` mapped to the empty string.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Homepage, if set to something non-blank.
    pub fn homepage_url(&self) -> Option<&str> {
        self.homepage.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }
}

/// Errors from the hosted API. A 404 is never an error: it maps to "absent".
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },
    #[error("API error ({status}) for {url}: {body}")]
    Status { status: u16, url: String, body: String },
    #[error("failed to parse response from {url}: {message}")]
    Parse { url: String, message: String },
}

/// Read-only access to the repositories of the authenticated user.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// All repositories, every page, in the API's "recently updated" order.
    async fn list_repos(&self) -> Result<Vec<RawRepo>, ApiError>;

    /// Language byte counts; empty when the repository has none.
    async fn languages(&self, owner: &str, repo: &str) -> Result<LanguageBytes, ApiError>;

    /// Published pages site, `None` when pages are not enabled.
    async fn pages_url(&self, owner: &str, repo: &str) -> Result<Option<String>, ApiError>;

    /// Decoded README text, `None` when the repository has no README.
    async fn readme(&self, owner: &str, repo: &str) -> Result<Option<String>, ApiError>;
}

/// Input handed to a summarizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    pub name: String,
    pub description: String,
    /// Already truncated to the configured character limit.
    pub readme: String,
}

/// Turns a repository's README into a short summary.
///
/// Implementations swallow their own failures: `None` means "no usable
/// summary", never "abort the run".
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: &SummaryRequest) -> Option<String>;
}
