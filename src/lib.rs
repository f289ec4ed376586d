//! repo-digest: a JSON digest of a GitHub account's own repositories.
//!
//! The pipeline lists repositories through the REST API, drops forks and
//! denylisted names, enriches each one with its languages, pages URL and an
//! optional LLM-written summary, aggregates a weighted language breakdown and
//! writes everything as one JSON document.

pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod config;
pub mod contract;
pub mod credentials;
pub mod filter;
pub mod github;
pub mod load_config;
pub mod pipeline;
pub mod policy;
pub mod report;
pub mod summarize;

pub use cli::{run, Cli};
pub use config::DigestConfig;
pub use pipeline::{build_digest, run_pipeline, PipelineReport};
