//! One versioning run, end to end
//!
//! Resolve history, compute the suffix once, then patch each project in
//! turn. All network access completes before the first file is read.

use chrono::{DateTime, Utc};

use crate::Reporter;
use crate::calculator::VersionSuffix;
use crate::config::Config;
use crate::error::StampError;
use crate::history::RunHistory;
use crate::patcher::{PatchResult, Patcher};

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct StampReport {
    /// Workflow the current run belongs to.
    pub workflow_id: u64,
    /// Suffix applied to every project.
    pub suffix: VersionSuffix,
    /// Every metadata file visited, in processing order.
    pub results: Vec<PatchResult>,
}

impl StampReport {
    /// Number of files rewritten (or that would be, in a dry run).
    pub fn patched(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_patched())
            .count()
    }

    /// Number of files skipped with a warning.
    pub fn skipped(&self) -> usize {
        self.results.len() - self.patched()
    }
}

/// Compute the version for the current run and apply it to the workspace.
///
/// # Errors
///
/// Fails if the run history cannot be retrieved, the workspace cannot be
/// listed, or a metadata file cannot be read or written. Projects whose
/// metadata lacks a usable declaration are reported as warnings instead.
pub async fn stamp<H, R>(
    config: &Config,
    history: &H,
    reporter: &R,
    now: DateTime<Utc>,
) -> Result<StampReport, StampError>
where
    H: RunHistory + ?Sized,
    R: Reporter + ?Sized,
{
    let workflow_id = history.workflow_id(config.run_id).await?;
    let runs = history.list_runs(workflow_id).await?;

    let suffix = VersionSuffix::calculate(now, config.run_number, &runs);
    tracing::info!(
        %suffix,
        workflow_id,
        run_number = config.run_number,
        history = runs.len(),
        "Calculated version suffix"
    );

    let results = Patcher::new(suffix, reporter)
        .dry_run(config.dry_run)
        .patch_workspace(&config.workspace)?;

    Ok(StampReport {
        workflow_id,
        suffix,
        results,
    })
}
