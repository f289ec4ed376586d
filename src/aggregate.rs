//! Run-wide language breakdown.

use crate::config::LanguageConfig;
use crate::contract::LanguageBytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the aggregate breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub color: String,
    pub percentage: f64,
}

/// A language as shown on a single repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageTag {
    pub name: String,
    pub color: String,
}

/// Display list for one repository: every reported language, most bytes first.
/// A map whose bytes sum to zero yields nothing.
pub fn language_tags(bytes: &LanguageBytes, config: &LanguageConfig) -> Vec<LanguageTag> {
    if bytes.values().sum::<u64>() == 0 {
        return Vec::new();
    }
    let mut ordered: Vec<(&String, &u64)> = bytes.iter().collect();
    // BTreeMap iteration is by name, so the stable sort breaks byte ties by name.
    ordered.sort_by(|a, b| b.1.cmp(a.1));
    ordered
        .into_iter()
        .map(|(name, _)| LanguageTag {
            name: name.clone(),
            color: config.color_for(name).to_string(),
        })
        .collect()
}

/// Accumulates weighted byte counts across repositories.
pub struct LanguageAggregator<'a> {
    config: &'a LanguageConfig,
    totals: BTreeMap<String, u64>,
}

impl<'a> LanguageAggregator<'a> {
    pub fn new(config: &'a LanguageConfig) -> Self {
        Self {
            config,
            totals: BTreeMap::new(),
        }
    }

    /// Adds one repository's bytes. Hidden languages are skipped and the
    /// weighted count is truncated per repository.
    pub fn add(&mut self, bytes: &LanguageBytes) {
        for (lang, count) in bytes {
            if self.config.is_hidden(lang) {
                continue;
            }
            let weighted = (*count as f64 * self.config.weight_for(lang)) as u64;
            *self.totals.entry(lang.clone()).or_insert(0) += weighted;
        }
    }

    pub fn totals(&self) -> &BTreeMap<String, u64> {
        &self.totals
    }

    /// Percentages of the weighted total, one decimal. Languages under the
    /// threshold are summed into a trailing "Other" row, omitted when zero.
    pub fn breakdown(&self) -> Vec<LanguageShare> {
        let total: u64 = self.totals.values().sum();
        if total == 0 {
            return Vec::new();
        }

        let mut ordered: Vec<(&String, &u64)> = self.totals.iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(a.1));

        let mut shares = Vec::new();
        let mut other = 0.0;
        for (lang, count) in ordered {
            let pct = round1(*count as f64 / total as f64 * 100.0);
            if pct >= self.config.other_threshold {
                shares.push(LanguageShare {
                    name: lang.clone(),
                    color: self.config.color_for(lang).to_string(),
                    percentage: pct,
                });
            } else {
                other += pct;
            }
        }

        if other > 0.0 {
            shares.push(LanguageShare {
                name: "Other".to_string(),
                color: self.config.other_color.clone(),
                percentage: round1(other),
            });
        }
        shares
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
