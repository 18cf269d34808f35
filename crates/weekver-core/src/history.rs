//! Prior pipeline runs
//!
//! The version calculator only needs a run's sequence number and when it was
//! created. Where that history comes from is behind [`RunHistory`] so the
//! calculator can be fed from the CI provider or from a fixed list in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StampError;

/// One execution of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRun {
    /// Sequence number, monotonically increasing across runs of a pipeline.
    pub number: u64,
    /// When the run was created.
    pub created_at: DateTime<Utc>,
}

/// A source of pipeline run history (e.g. GitHub Actions).
#[async_trait]
pub trait RunHistory: Send + Sync {
    /// Resolve the pipeline (workflow) a run belongs to.
    async fn workflow_id(&self, run_id: u64) -> Result<u64, StampError>;

    /// Every known run of a pipeline, fully materialized.
    async fn list_runs(&self, workflow_id: u64) -> Result<Vec<BuildRun>, StampError>;
}
