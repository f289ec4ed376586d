use crate::credentials::resolve_token;
use crate::github::GitHubClient;
use crate::load_config::load_from_env;
use crate::pipeline::run_pipeline;
use crate::policy::RunMode;
use crate::summarize::CliSummarizer;
use anyhow::Result;
use clap::Parser;

/// CLI for repo-digest: build a JSON digest of your GitHub repositories.
#[derive(Parser, Debug)]
#[clap(
    name = "repo-digest",
    version,
    about = "Fetch GitHub repository metadata and optionally refresh LLM summaries"
)]
pub struct Cli {
    /// Ignore cached summaries
    #[clap(long)]
    pub force: bool,

    /// Fetch READMEs and generate summaries for repositories without one
    #[clap(long = "refresh-summaries")]
    pub refresh_summaries: bool,
}

impl Cli {
    pub fn mode(&self) -> RunMode {
        RunMode {
            force: self.force,
            refresh_summaries: self.refresh_summaries,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_from_env()?;
    let token = resolve_token(&config.credentials)?;
    let host = GitHubClient::new(token, &config.api)?;
    let summarizer = CliSummarizer::new(config.summarizer.clone());

    let report = match run_pipeline(&config, &host, &summarizer, cli.mode()).await {
        Ok(report) => {
            tracing::info!(?report, "Digest complete");
            report
        }
        Err(e) => {
            tracing::error!(error = %e, "Digest failed");
            return Err(e);
        }
    };

    if let Some(cache_path) = &report.cache_path {
        println!(
            "Wrote summaries to {} ({} refreshed)",
            cache_path.display(),
            report.stats.generated
        );
    }
    println!(
        "Wrote {} repos ({} summary cache hits) to {}",
        report.repos_written,
        report.stats.cache_hits,
        report.report_path.display()
    );
    Ok(())
}
