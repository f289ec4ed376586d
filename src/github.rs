//! GitHub REST client implementing [`RepoHost`].
//!
//! One request in flight at a time. A 404 maps to `None`; every other
//! non-2xx status is an [`ApiError`] that aborts the run.

use crate::config::ApiConfig;
use crate::contract::{ApiError, LanguageBytes, RawRepo, RepoHost};
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LINK};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info};

pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    per_page: u32,
}

#[derive(Deserialize)]
struct PagesResponse {
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct ReadmeResponse {
    content: Option<String>,
}

impl GitHubClient {
    pub fn new(token: String, config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let accept = HeaderValue::from_str(&config.accept).map_err(|e| ApiError::Http {
            url: config.base_url.clone(),
            message: format!("invalid accept header: {e}"),
        })?;
        headers.insert(ACCEPT, accept);

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Http {
                url: config.base_url.clone(),
                message: e.to_string(),
            })?;

        info!(base_url = %config.base_url, "Initialized GitHub client");
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            per_page: config.per_page,
        })
    }

    fn repo_url(&self, owner: &str, repo: &str, resource: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.base_url, owner, repo, resource)
    }

    /// GET `url` and decode the JSON body. Returns the body and the `next`
    /// pagination link, or `None` on 404.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Option<(T, Option<String>)>, ApiError> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, url = %url, "Request failed");
                ApiError::Http {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "404, treating as absent");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            error!(status = %status, url = %url, "API returned error. Response body: {body}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_link);

        let body = response.json::<T>().await.map_err(|e| {
            error!(error = ?e, url = %url, "Failed to decode JSON body");
            ApiError::Parse {
                url: url.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Some((body, next)))
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn list_repos(&self) -> Result<Vec<RawRepo>, ApiError> {
        let mut repos = Vec::new();
        let mut url = Some(format!(
            "{}/user/repos?per_page={}&sort=updated&affiliation=owner",
            self.base_url, self.per_page
        ));
        let mut pages = 0usize;

        while let Some(current) = url.take() {
            match self.get_json::<Vec<RawRepo>>(&current).await? {
                Some((page, next)) => {
                    pages += 1;
                    debug!(page = pages, count = page.len(), "Fetched repository page");
                    repos.extend(page);
                    url = next;
                }
                None => break,
            }
        }

        info!(pages, count = repos.len(), "Listed repositories");
        Ok(repos)
    }

    async fn languages(&self, owner: &str, repo: &str) -> Result<LanguageBytes, ApiError> {
        let url = self.repo_url(owner, repo, "languages");
        Ok(self
            .get_json::<LanguageBytes>(&url)
            .await?
            .map(|(bytes, _)| bytes)
            .unwrap_or_default())
    }

    async fn pages_url(&self, owner: &str, repo: &str) -> Result<Option<String>, ApiError> {
        let url = self.repo_url(owner, repo, "pages");
        Ok(self
            .get_json::<PagesResponse>(&url)
            .await?
            .and_then(|(pages, _)| pages.html_url)
            .filter(|u| !u.is_empty()))
    }

    async fn readme(&self, owner: &str, repo: &str) -> Result<Option<String>, ApiError> {
        let url = self.repo_url(owner, repo, "readme");
        let content = self
            .get_json::<ReadmeResponse>(&url)
            .await?
            .and_then(|(readme, _)| readme.content);
        Ok(content.as_deref().and_then(decode_readme_content))
    }
}

/// Extracts the `rel="next"` target from a `Link` header value.
pub fn next_link(header: &str) -> Option<String> {
    header
        .split(',')
        .filter(|part| part.contains("rel=\"next\""))
        .find_map(|part| {
            let start = part.find('<')? + 1;
            let end = part[start..].find('>')? + start;
            Some(part[start..end].to_string())
        })
}

/// Decodes the base64 `content` field of a README response. The API wraps
/// the payload at 60 columns; whitespace is ignored and invalid UTF-8 is
/// replaced rather than rejected.
pub fn decode_readme_content(content: &str) -> Option<String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    match base64::engine::general_purpose::STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!(error = ?e, "README content is not valid base64");
            None
        }
    }
}
