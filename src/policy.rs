//! Per-repository summary decision.
//!
//! Precedence: reusable cache entry → no generation pass → thin README with a
//! homepage → thin README without one → summarizer → homepage/pages template
//! as a last resort.

use crate::cache::SummaryCache;
use crate::config::PolicyConfig;
use crate::contract::{ApiError, RawRepo, RepoHost, SummaryRequest, Summarizer};
use crate::summarize::truncate_chars;
use tracing::info;

/// Flags that change how summaries are produced for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Ignore cached summaries.
    pub force: bool,
    /// Fetch READMEs and generate summaries for cache misses.
    pub refresh_summaries: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Non-empty cache entry reused without any network or summarizer call.
    Reused(String),
    /// No generation pass this run; whatever the cache held (if allowed).
    Carried(Option<String>),
    /// Produced this run. Empty means "looked, found nothing"; goes into the cache.
    Generated(String),
    /// No README and no description: leave the repository out of the digest.
    Skipped,
}

impl SummaryOutcome {
    /// The summary to publish, `None` when there is nothing to show.
    pub fn summary(&self) -> Option<&str> {
        let summary = match self {
            SummaryOutcome::Reused(s) | SummaryOutcome::Generated(s) => Some(s.as_str()),
            SummaryOutcome::Carried(s) => s.as_deref(),
            SummaryOutcome::Skipped => None,
        };
        summary.filter(|s| !s.is_empty())
    }
}

/// Template used when the repository is really the source of a website.
pub fn homepage_summary(url: &str) -> String {
    format!("Website code for {url}.")
}

/// README absent or too short to be worth summarizing.
pub fn is_thin(readme: Option<&str>, min_chars: usize) -> bool {
    match readme {
        None => true,
        Some(text) => text.trim().chars().count() < min_chars,
    }
}

/// Inputs shared by every decision in a run.
pub struct DecisionContext<'a, H: ?Sized, S: ?Sized> {
    pub host: &'a H,
    pub summarizer: &'a S,
    pub cache: &'a SummaryCache,
    pub policy: &'a PolicyConfig,
    pub mode: RunMode,
    pub readme_char_limit: usize,
}

/// Decides the summary for one repository. Only API errors propagate.
pub async fn decide_summary<H, S>(
    ctx: &DecisionContext<'_, H, S>,
    repo: &RawRepo,
) -> Result<SummaryOutcome, ApiError>
where
    H: RepoHost + ?Sized,
    S: Summarizer + ?Sized,
{
    let name = repo.name.as_str();

    if !ctx.mode.force {
        if let Some(cached) = ctx.cache.reusable(name) {
            return Ok(SummaryOutcome::Reused(cached.to_string()));
        }
    }

    if !ctx.mode.refresh_summaries {
        let carried = if ctx.mode.force {
            None
        } else {
            ctx.cache.get(name).map(str::to_string)
        };
        return Ok(SummaryOutcome::Carried(carried));
    }

    let description = repo.description_text().trim();
    let homepage = repo.homepage_url();
    let readme = ctx.host.readme(&repo.owner.login, name).await?;

    let summary = if is_thin(readme.as_deref(), ctx.policy.thin_readme_chars) {
        if let Some(home) = homepage {
            info!(repo = %name, homepage = %home, "Thin README, using website template");
            homepage_summary(home)
        } else if readme.is_none() && description.is_empty() && ctx.policy.skip_undocumented {
            info!(repo = %name, "No README or description, skipping repository");
            return Ok(SummaryOutcome::Skipped);
        } else {
            info!(
                repo = %name,
                has_description = !description.is_empty(),
                "Thin README, using description"
            );
            description.to_string()
        }
    } else {
        let readme = readme.as_deref().unwrap_or_default();
        let request = SummaryRequest {
            name: name.to_string(),
            description: description.to_string(),
            readme: truncate_chars(readme, ctx.readme_char_limit).to_string(),
        };
        ctx.summarizer.summarize(&request).await.unwrap_or_default()
    };

    Ok(SummaryOutcome::Generated(summary))
}

/// Last resort once the pages URL is known: an empty generated summary becomes
/// the website template for the homepage, or failing that the pages site.
pub fn with_site_fallback(
    outcome: SummaryOutcome,
    repo: &RawRepo,
    pages_url: Option<&str>,
) -> SummaryOutcome {
    match outcome {
        SummaryOutcome::Generated(summary) if summary.is_empty() => {
            let site = repo.homepage_url().or(pages_url.filter(|u| !u.is_empty()));
            match site {
                Some(url) => {
                    info!(
                        repo = %repo.name,
                        url = %url,
                        "No summary produced, falling back to website template"
                    );
                    SummaryOutcome::Generated(homepage_summary(url))
                }
                None => SummaryOutcome::Generated(summary),
            }
        }
        other => other,
    }
}
