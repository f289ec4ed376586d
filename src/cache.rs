//! Persisted name → summary map, read once at startup and written once at the end.

use crate::report::write_atomic;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryCache {
    #[serde(default)]
    pub summaries: BTreeMap<String, String>,
}

impl SummaryCache {
    /// Loads the cache. A missing or unreadable file is an empty cache, not an error.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "No summary cache yet");
            return Self::default();
        }
        let parsed = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|json| {
                serde_json::from_str::<SummaryCache>(&json).map_err(anyhow::Error::from)
            });
        match parsed {
            Ok(cache) => {
                info!(
                    path = %path.display(),
                    entries = cache.summaries.len(),
                    "Loaded summary cache"
                );
                cache
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable summary cache");
                Self::default()
            }
        }
    }

    /// The cached summary for `name`, if one exists and is non-empty.
    pub fn reusable(&self, name: &str) -> Option<&str> {
        self.summaries
            .get(name)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.summaries.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, summary: impl Into<String>) {
        self.summaries.insert(name.into(), summary.into());
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Writes `{"summaries": {...}}` sorted by name, with a trailing newline.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json =
            serde_json::to_string_pretty(self).context("failed to serialize summary cache")?;
        json.push('\n');
        write_atomic(path, json.as_bytes())?;
        info!(path = %path.display(), entries = self.summaries.len(), "Saved summary cache");
        Ok(())
    }
}
