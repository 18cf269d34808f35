//! Run configuration
//!
//! Everything the hosted CI environment supplies, gathered once and passed
//! explicitly into the history client and the patcher.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::StampError;

/// Default REST endpoint of the CI provider.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl FromStr for Repository {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(StampError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Inputs for one versioning run.
#[derive(Clone)]
pub struct Config {
    /// API token, only ever sent to the run history endpoint.
    pub token: String,
    /// Repository whose pipeline history is read.
    pub repository: Repository,
    /// Identifier of the current run.
    pub run_id: u64,
    /// Sequence number of the current run.
    pub run_number: u64,
    /// Root directory whose immediate subdirectories are projects.
    pub workspace: PathBuf,
    /// Base URL of the provider REST API.
    pub api_url: String,
    /// Report the versions that would be written without touching files.
    pub dry_run: bool,
}

// Hand-written so the token never ends up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"***")
            .field("repository", &self.repository)
            .field("run_id", &self.run_id)
            .field("run_number", &self.run_number)
            .field("workspace", &self.workspace)
            .field("api_url", &self.api_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
