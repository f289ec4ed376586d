//! Access-token resolution: credential helper first, then environment.

use crate::config::CredentialConfig;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("No GitHub token found. Run 'gh auth login' or set {hint}.")]
    Missing { hint: String },
}

/// Returns the token from the helper command or the first non-empty variable.
pub fn resolve_token(config: &CredentialConfig) -> Result<String, CredentialError> {
    resolve_token_with(config, |key| std::env::var(key).ok())
}

/// Same as [`resolve_token`] with an injectable environment lookup.
pub fn resolve_token_with<F>(
    config: &CredentialConfig,
    env_lookup: F,
) -> Result<String, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = run_helper(&config.helper) {
        info!(helper = %config.helper.join(" "), "Using token from credential helper");
        return Ok(token);
    }

    for key in &config.env_vars {
        let token = env_lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if let Some(token) = token {
            info!(var = %key, "Using token from environment");
            return Ok(token);
        }
    }

    warn!("No credential helper output and no token variables set");
    Err(CredentialError::Missing {
        hint: config
            .env_vars
            .first()
            .cloned()
            .unwrap_or_else(|| "GITHUB_TOKEN".to_string()),
    })
}

fn run_helper(helper: &[String]) -> Option<String> {
    let (program, args) = helper.split_first()?;

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(out) if out.status.success() => {
            let token = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if token.is_empty() {
                debug!(program = %program, "Credential helper succeeded but printed nothing");
                None
            } else {
                Some(token)
            }
        }
        Ok(out) => {
            debug!(program = %program, status = ?out.status, "Credential helper exited non-zero");
            None
        }
        Err(e) => {
            debug!(program = %program, error = ?e, "Failed to launch credential helper");
            None
        }
    }
}
