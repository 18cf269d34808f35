//! weekver - week-based build versions for CI
//!
//! Reads the hosted CI environment, computes a `yy.week.build` suffix from
//! the workflow's run history and rewrites the `AssemblyVersion` of every
//! project in the workspace.
//!
//! Every option can be given as a flag or picked up from the variable the
//! GitHub Actions runner sets (`GITHUB_REPOSITORY`, `GITHUB_RUN_ID`, ...),
//! so inside a workflow the binary usually runs without arguments.

#![allow(clippy::missing_errors_doc)]

pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;

use weekver_core::config::DEFAULT_API_URL;
use weekver_core::{Config, GitHubClient, Reporter, Repository, StampReport};

pub use output::Output;

/// Stamp week-based build versions into AssemblyInfo files
#[derive(Debug, Parser)]
#[command(name = "weekver")]
#[command(author, version = env!("WEEKVER_VERSION"))]
pub struct Cli {
    /// API token used to read the workflow run history
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Repository,

    /// Identifier of the current workflow run
    #[arg(long, env = "GITHUB_RUN_ID")]
    pub run_id: u64,

    /// Sequence number of the current workflow run
    #[arg(long, env = "GITHUB_RUN_NUMBER")]
    pub run_number: u64,

    /// Directory whose immediate subdirectories are projects
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: PathBuf,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Compute the version as of this instant (RFC 3339) instead of now
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<DateTime<Utc>>,

    /// Show what would happen without making changes
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Split into the run configuration and the instant to version for.
    pub fn into_config(self) -> (Config, DateTime<Utc>) {
        let now = self.at.unwrap_or_else(Utc::now);
        let config = Config {
            token: self.token.unwrap_or_default(),
            repository: self.repository,
            run_id: self.run_id,
            run_number: self.run_number,
            workspace: self.workspace,
            api_url: self.api_url,
            dry_run: self.dry_run,
        };
        (config, now)
    }
}

/// Run one versioning pass against the GitHub API.
pub async fn run<R: Reporter + ?Sized>(cli: Cli, reporter: &R) -> Result<StampReport> {
    let (config, now) = cli.into_config();
    tracing::debug!(?config, %now, "Starting versioning run");

    let history = GitHubClient::new(&config);
    let report = weekver_core::stamp(&config, &history, reporter, now)
        .await
        .with_context(|| format!("Failed to version {}", config.repository))?;

    Ok(report)
}

/// One-line summary of a finished run.
pub fn summary(report: &StampReport, dry_run: bool) -> String {
    let verb = if dry_run { "Would stamp" } else { "Stamped" };
    let mut line = format!(
        "{verb} {} project(s) with *.{}",
        report.patched(),
        report.suffix
    );
    if report.skipped() > 0 {
        line.push_str(&format!(", {} skipped", report.skipped()));
    }
    line
}
