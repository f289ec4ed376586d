use crate::config::PolicyConfig;
use crate::contract::RawRepo;
use tracing::debug;

/// Drops forks and denylisted names, keeping enumeration order.
pub fn filter_repos(repos: Vec<RawRepo>, policy: &PolicyConfig) -> Vec<RawRepo> {
    repos
        .into_iter()
        .filter(|repo| {
            if repo.fork {
                debug!(repo = %repo.name, "Skipping fork");
                return false;
            }
            if policy.is_denied(&repo.name) {
                debug!(repo = %repo.name, "Skipping denylisted repository");
                return false;
            }
            true
        })
        .collect()
}
