//! The serialized digest: record types, ordering, and atomic file output.

use crate::aggregate::{LanguageShare, LanguageTag};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// A repository as it appears in the digest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoRecord {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub html_url: String,
    pub private: bool,
    pub languages: Vec<LanguageTag>,
    /// Empty string when pages are not enabled.
    pub pages_url: String,
    pub stargazers_count: u64,
    pub topics: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub archived: bool,
    pub fork: bool,
}

impl RepoRecord {
    /// Year from the first four characters of `created_at`; 0 when unparsable.
    pub fn creation_year(&self) -> u32 {
        self.created_at
            .get(..4)
            .and_then(|y| y.parse().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestReport {
    pub languages: Vec<LanguageShare>,
    pub repos: Vec<RepoRecord>,
}

/// Newest creation year first; within a year, most stars first.
///
/// Two stable passes, stars then year, so equal keys keep enumeration order.
pub fn sort_repos(repos: &mut [RepoRecord]) {
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    repos.sort_by_key(|r| std::cmp::Reverse(r.creation_year()));
}

/// Writes `contents` to `path` through a temporary file in the same
/// directory, creating parent directories first.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("failed to write temp file for {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to move output into place at {}", path.display()))?;

    debug!(path = %path.display(), bytes = contents.len(), "Wrote file atomically");
    Ok(())
}

/// Serializes the digest as two-space indented JSON.
pub fn write_report(path: &Path, report: &DigestReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize digest")?;
    write_atomic(path, json.as_bytes())?;
    info!(
        path = %path.display(),
        repos = report.repos.len(),
        languages = report.languages.len(),
        "Wrote digest"
    );
    Ok(())
}

/// Reads a digest previously written by [`write_report`].
pub fn read_report(path: &Path) -> Result<DigestReport> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read digest from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse digest {}", path.display()))
}
