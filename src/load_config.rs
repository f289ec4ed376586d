use crate::config::DigestConfig;
use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Environment variable naming an optional YAML override file.
pub const CONFIG_ENV_VAR: &str = "REPO_DIGEST_CONFIG";

/// Loads a YAML config file on top of the built-in defaults.
/// Fields missing from the file keep their default values.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DigestConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!("Failed to read config file {:?}: {}", path_ref, e));
        }
    };

    // An empty file deserializes to `null`, which means "all defaults".
    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(DigestConfig::default());
    }

    let config: DigestConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if !(0.0..=100.0).contains(&config.languages.other_threshold) {
        error!(
            threshold = config.languages.other_threshold,
            "languages.other_threshold out of range"
        );
        anyhow::bail!(
            "languages.other_threshold must be between 0 and 100, got {}",
            config.languages.other_threshold
        );
    }

    if let Some((lang, weight)) = config.languages.weights.iter().find(|(_, w)| **w < 0.0) {
        error!(language = %lang, weight, "Negative language weight in config");
        anyhow::bail!("languages.weights.{lang} must not be negative, got {weight}");
    }

    Ok(config)
}

/// Resolves the run configuration: the file named by `REPO_DIGEST_CONFIG`
/// when set, otherwise the built-in defaults.
pub fn load_from_env() -> Result<DigestConfig> {
    let config = match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => load_config(path)?,
        _ => {
            info!("No {CONFIG_ENV_VAR} set, using built-in configuration");
            DigestConfig::default()
        }
    };
    config.trace_loaded();
    Ok(config)
}
