// repo-digest/src/config.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything the pipeline treats as fixed business rules: which repositories
/// to hide, how languages are weighted and coloured, where output goes.
///
/// Built once at startup and passed by reference into the client, the filter
/// and the aggregator. Every section falls back to its defaults, so a YAML
/// override only needs the fields it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub api: ApiConfig,
    pub credentials: CredentialConfig,
    pub summarizer: SummarizerConfig,
    pub policy: PolicyConfig,
    pub languages: LanguageConfig,
    pub output: OutputConfig,
}

impl DigestConfig {
    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.api.base_url,
            denylist = self.policy.denylist.len(),
            report_path = %self.output.report_path.display(),
            cache_path = %self.output.cache_path.display(),
            "Loaded DigestConfig"
        );
        debug!(?self, "DigestConfig loaded (full debug)");
    }
}

/// Hosted API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
    pub accept: String,
    pub per_page: u32,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            user_agent: "repo-digest".to_string(),
            accept: "application/vnd.github.v3+json".to_string(),
            per_page: 100,
            timeout_secs: 30,
        }
    }
}

/// Where the access token comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Program and arguments whose stdout is the token.
    pub helper: Vec<String>,
    /// Checked in order after the helper fails.
    pub env_vars: Vec<String>,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            helper: vec!["gh".into(), "auth".into(), "token".into()],
            env_vars: vec!["GITHUB_TOKEN".into(), "GH_TOKEN".into()],
        }
    }
}

/// External text-generation tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub command: String,
    pub model: String,
    pub timeout_secs: u64,
    pub working_dir: PathBuf,
    /// README characters handed to the summarizer.
    pub readme_char_limit: usize,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            command: "claude".to_string(),
            model: "haiku".to_string(),
            timeout_secs: 30,
            working_dir: std::env::temp_dir(),
            readme_char_limit: 3000,
        }
    }
}

/// Which repositories make it into the digest and how summaries are chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub denylist: BTreeSet<String>,
    /// READMEs shorter than this (after trimming) are too thin to summarize.
    pub thin_readme_chars: usize,
    /// Drop repositories that have neither a README nor a description.
    pub skip_undocumented: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let denylist = [
            "oblivion",
            "nasc",
            "iter-landing-page",
            "acupunturafloripa",
            "algorit-wp-theme",
            "bulldesk-cf7-integration",
            "bulldesk-site",
            "iter",
            "tracelog",
            "medical",
            "momentodohler",
            "formabella",
            "three",
            "koerich-consultoria",
            "fundamentando",
            "testing",
            "projects",
            "report",
            "partners",
            "iafut-backend",
            "cross-domain",
            "web3-backup-template",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            denylist,
            thin_readme_chars: 20,
            skip_undocumented: false,
        }
    }
}

impl PolicyConfig {
    pub fn is_denied(&self, name: &str) -> bool {
        self.denylist.contains(name)
    }
}

/// Language colours and the weighting rules of the aggregate breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub colors: BTreeMap<String, String>,
    pub default_color: String,
    pub other_color: String,
    /// Excluded from the aggregate entirely (still listed per repository).
    pub hidden: BTreeSet<String>,
    /// Multiplier applied to a language's bytes before aggregation. Absent means 1.
    pub weights: BTreeMap<String, f64>,
    /// Percentage below which a language is folded into "Other".
    pub other_threshold: f64,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let colors = [
            ("Rust", "#dea584"),
            ("Python", "#3572A5"),
            ("JavaScript", "#f1e05a"),
            ("TypeScript", "#3178c6"),
            ("PHP", "#4F5D95"),
            ("HTML", "#e34c26"),
            ("CSS", "#563d7c"),
            ("SCSS", "#c6538c"),
            ("Shell", "#89e051"),
            ("Go", "#00ADD8"),
            ("Ruby", "#701516"),
            ("Java", "#b07219"),
            ("C", "#555555"),
            ("C++", "#f34b7d"),
            ("C#", "#178600"),
            ("Swift", "#F05138"),
            ("Kotlin", "#A97BFF"),
            ("Dart", "#00B4AB"),
            ("Vue", "#41b883"),
            ("Svelte", "#ff3e00"),
            ("Solidity", "#AA6746"),
            ("Makefile", "#427819"),
            ("Dockerfile", "#384d54"),
            ("Lua", "#000080"),
            ("Vim Script", "#199f4b"),
            ("Nix", "#7e7eff"),
            ("Zig", "#ec915c"),
            ("Haskell", "#5e5086"),
            ("Elixir", "#6e4a7e"),
            ("Blade", "#f7523f"),
            ("Jupyter Notebook", "#DA5B0B"),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color.to_string()))
        .collect();

        Self {
            colors,
            default_color: "#58a6ff".to_string(),
            other_color: "#8b949e".to_string(),
            hidden: ["HTML", "CSS"].into_iter().map(String::from).collect(),
            weights: [("Jupyter Notebook".to_string(), 0.15), ("Rust".to_string(), 2.0)]
                .into_iter()
                .collect(),
            other_threshold: 0.5,
        }
    }
}

impl LanguageConfig {
    pub fn color_for(&self, language: &str) -> &str {
        self.colors
            .get(language)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    pub fn weight_for(&self, language: &str) -> f64 {
        self.weights.get(language).copied().unwrap_or(1.0)
    }

    pub fn is_hidden(&self, language: &str) -> bool {
        self.hidden.contains(language)
    }
}

/// Output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_path: PathBuf,
    pub cache_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from("data/repos.json"),
            cache_path: PathBuf::from("data/repo-descriptions.json"),
        }
    }
}
