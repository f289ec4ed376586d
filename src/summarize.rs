//! Summaries from an external text-generation CLI.
//!
//! The CLI's free-text answer is unreliable: it sometimes opens with
//! filler, labels its answer, or declines to answer at all. [`ResponseCleaner`]
//! normalizes the first two and rejects the third, so a refusal never ends up
//! in the digest.

use crate::config::SummarizerConfig;
use crate::contract::{SummaryRequest, Summarizer};
use async_trait::async_trait;
use regex::Regex;
use std::process::Stdio;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Builds the fixed instruction prompt for one repository.
pub fn build_prompt(request: &SummaryRequest) -> String {
    let description = if request.description.trim().is_empty() {
        "none"
    } else {
        request.description.as_str()
    };
    format!(
        "You have all the information you need below. Do NOT ask for more info.\n\n\
         Project name: {}\n\
         Description: {}\n\
         README content:\n{}\n\n\
         Using ONLY the information above, write a 2-3 sentence summary of this project. \
         Start directly with a noun or verb (e.g. 'A tool that...' or 'CLI for...'). \
         NEVER ask questions. NEVER say you need more info. NEVER use preamble. \
         Output ONLY the summary text. No markdown. No quotes.",
        request.name, description, request.readme
    )
}

/// First `limit` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Post-processing for raw summarizer output.
pub struct ResponseCleaner {
    preamble: Regex,
    label_probe: Regex,
    label: Regex,
    refusal: Regex,
}

impl Default for ResponseCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCleaner {
    pub fn new() -> Self {
        Self {
            preamble: Regex::new(
                r"(?i)^(Based on[^,:.]*[,:.]?\s*|Here'?s?\s[^,:]*[,:]\s*|I'd be happy[^.]*\.\s*|Sure[,!.]\s*|The README mentions[^.]*\.\s*)",
            )
            .expect("valid preamble pattern"),
            label_probe: Regex::new(r"(?i)^.*?summary[:\s]").expect("valid label pattern"),
            label: Regex::new(r"(?i)^.*?summary[:\s]+").expect("valid label pattern"),
            refusal: Regex::new(
                r"(?i)(I don't have|I need access|Could you|I cannot|I can't|provide me|access to the repo|clarify which|Do you have|Once I have|I'll need|you want summarized|Can you provide|I see this is|not documented|appears to be|though specific|functionality details|no available description|no available README|without documented|no description or README|not enough information)",
            )
            .expect("valid refusal pattern"),
        }
    }

    /// Returns the cleaned summary, or `None` when the response is empty or
    /// reads as a refusal or a hedge.
    pub fn clean(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');

        let without_preamble = self.preamble.replace(trimmed, "");
        let mut summary = without_preamble
            .trim_start_matches([' ', '.', ',', ':', '-', '\n'])
            .to_string();

        if self.label_probe.is_match(truncate_chars(&summary, 60)) {
            summary = self.label.replace(&summary, "").into_owned();
        }

        if let Some(hit) = self.refusal.find(&summary) {
            debug!(phrase = hit.as_str(), "Rejected summarizer response");
            return None;
        }

        let summary = summary.trim();
        if summary.is_empty() {
            None
        } else {
            Some(summary.to_string())
        }
    }
}

/// Runs `<command> -p --model <model> <prompt>` with a wall-clock timeout.
pub struct CliSummarizer {
    config: SummarizerConfig,
    cleaner: ResponseCleaner,
}

impl CliSummarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self {
            config,
            cleaner: ResponseCleaner::new(),
        }
    }
}

#[async_trait]
impl Summarizer for CliSummarizer {
    async fn summarize(&self, request: &SummaryRequest) -> Option<String> {
        let prompt = build_prompt(request);
        let mut cmd = tokio::process::Command::new(&self.config.command);
        cmd.arg("-p")
            .arg("--model")
            .arg(&self.config.model)
            .arg(prompt)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            // The CLI refuses to start when it thinks it is nested in another session.
            .env_remove("CLAUDECODE")
            .kill_on_drop(true);

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(
                    repo = %request.name,
                    error = ?e,
                    command = %self.config.command,
                    "Failed to launch summarizer"
                );
                return None;
            }
            Err(_) => {
                warn!(
                    repo = %request.name,
                    timeout_secs = self.config.timeout_secs,
                    "Summarizer timed out"
                );
                return None;
            }
        };

        if !output.status.success() {
            warn!(repo = %request.name, status = ?output.status, "Summarizer exited non-zero");
            return None;
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        let summary = self.cleaner.clean(&raw);
        match &summary {
            Some(s) => info!(repo = %request.name, chars = s.chars().count(), "Generated summary"),
            None => info!(repo = %request.name, "Summarizer response rejected"),
        }
        summary
    }
}
