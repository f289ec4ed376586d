//! High-level pipeline: enumerate → filter → enrich → aggregate → write.
//!
//! # Responsibilities
//! - Fail-fast on any API error: nothing is written unless every fetch succeeded
//! - Summarizer failures degrade to empty summaries and never stop the run
//! - Reads the summary cache once and writes it once, after the digest
//!
//! # Navigation
//! - Main entrypoint: [`run_pipeline`]
//! - Pure assembly without file output: [`build_digest`]

use crate::aggregate::{language_tags, LanguageAggregator};
use crate::cache::SummaryCache;
use crate::config::DigestConfig;
use crate::contract::{RepoHost, Summarizer};
use crate::filter::filter_repos;
use crate::policy::{decide_summary, with_site_fallback, DecisionContext, RunMode, SummaryOutcome};
use crate::report::{sort_repos, write_report, DigestReport, RepoRecord};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info};

/// Counters describing one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DigestStats {
    pub enumerated: usize,
    pub cache_hits: usize,
    pub generated: usize,
    pub skipped: usize,
}

/// Outcome of [`run_pipeline`].
#[derive(Debug)]
pub struct PipelineReport {
    pub report_path: PathBuf,
    /// Set when the summary cache was rewritten this run.
    pub cache_path: Option<PathBuf>,
    pub repos_written: usize,
    pub stats: DigestStats,
}

/// Fetches and enriches every repository and assembles the digest.
///
/// Returns the digest and the cache as it should be persisted: the previous
/// entries with everything generated this run written over them.
pub async fn build_digest<H, S>(
    config: &DigestConfig,
    host: &H,
    summarizer: &S,
    cache: &SummaryCache,
    mode: RunMode,
) -> Result<(DigestReport, SummaryCache, DigestStats)>
where
    H: RepoHost + ?Sized,
    S: Summarizer + ?Sized,
{
    let mut stats = DigestStats::default();

    info!("[DIGEST] Fetching repositories");
    let all = host.list_repos().await.context("failed to list repositories")?;
    stats.enumerated = all.len();
    let repos = filter_repos(all, &config.policy);
    info!(
        found = repos.len(),
        enumerated = stats.enumerated,
        "[DIGEST] Filtered repositories"
    );

    let ctx = DecisionContext {
        host,
        summarizer,
        cache,
        policy: &config.policy,
        mode,
        readme_char_limit: config.summarizer.readme_char_limit,
    };

    let mut updated_cache = cache.clone();
    let mut aggregator = LanguageAggregator::new(&config.languages);
    let mut records = Vec::with_capacity(repos.len());
    let total = repos.len();

    for (i, repo) in repos.iter().enumerate() {
        let owner = repo.owner.login.as_str();
        let name = repo.name.as_str();

        let outcome = decide_summary(&ctx, repo)
            .await
            .with_context(|| format!("failed to decide summary for {name}"))?;
        let progress = format!("{}/{}", i + 1, total);

        if outcome == SummaryOutcome::Skipped {
            stats.skipped += 1;
            info!(progress = %progress, repo = %name, "(skipped)");
            continue;
        }

        let lang_bytes = host
            .languages(owner, name)
            .await
            .with_context(|| format!("failed to fetch languages for {name}"))?;
        let pages_url = host
            .pages_url(owner, name)
            .await
            .with_context(|| format!("failed to fetch pages for {name}"))?;
        let outcome = with_site_fallback(outcome, repo, pages_url.as_deref());

        match &outcome {
            SummaryOutcome::Reused(_) => {
                stats.cache_hits += 1;
                info!(progress = %progress, repo = %name, "(summary cached)");
            }
            SummaryOutcome::Generated(summary) => {
                stats.generated += 1;
                updated_cache.insert(name, summary.clone());
                info!(progress = %progress, repo = %name, "(summary refreshed)");
            }
            SummaryOutcome::Carried(_) | SummaryOutcome::Skipped => {
                info!(progress = %progress, repo = %name, "(no summary refresh)");
            }
        }

        aggregator.add(&lang_bytes);

        records.push(RepoRecord {
            name: repo.name.clone(),
            description: repo.description_text().to_string(),
            summary: outcome.summary().map(str::to_string),
            html_url: repo.html_url.clone(),
            private: repo.private,
            languages: language_tags(&lang_bytes, &config.languages),
            pages_url: pages_url.unwrap_or_default(),
            stargazers_count: repo.stargazers_count,
            topics: repo.topics.clone(),
            created_at: repo.created_at.clone(),
            updated_at: repo.updated_at.clone(),
            archived: repo.archived,
            fork: repo.fork,
        });
    }

    sort_repos(&mut records);
    let report = DigestReport {
        languages: aggregator.breakdown(),
        repos: records,
    };
    Ok((report, updated_cache, stats))
}

/// Runs the whole pipeline and writes the digest (and, when summaries were
/// refreshed, the cache) to the configured paths.
pub async fn run_pipeline<H, S>(
    config: &DigestConfig,
    host: &H,
    summarizer: &S,
    mode: RunMode,
) -> Result<PipelineReport>
where
    H: RepoHost + ?Sized,
    S: Summarizer + ?Sized,
{
    info!(
        force = mode.force,
        refresh_summaries = mode.refresh_summaries,
        "[DIGEST] Starting pipeline"
    );
    let cache = SummaryCache::load(&config.output.cache_path);

    let built = build_digest(config, host, summarizer, &cache, mode).await;
    let (report, updated_cache, stats) = match built {
        Ok(built) => built,
        Err(e) => {
            error!(error = ?e, "[DIGEST][ERROR] Pipeline aborted, nothing written");
            return Err(e);
        }
    };

    write_report(&config.output.report_path, &report)?;

    let cache_path = if mode.refresh_summaries {
        updated_cache.save(&config.output.cache_path)?;
        info!(
            path = %config.output.cache_path.display(),
            refreshed = stats.generated,
            "[DIGEST] Wrote summaries"
        );
        Some(config.output.cache_path.clone())
    } else {
        None
    };

    Ok(PipelineReport {
        report_path: config.output.report_path.clone(),
        cache_path,
        repos_written: report.repos.len(),
        stats,
    })
}
