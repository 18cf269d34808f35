//! weekver - week-based build numbering for CI
//!
//! Computes a `yy.week.build` version suffix from the current date and the
//! run history of the pipeline, then rewrites the `AssemblyVersion`
//! declaration of every project found in the workspace.
//!
//! # Overview
//!
//! - [`week`]: calendar week buckets (`WeekKey`).
//! - [`calculator`]: derives the [`VersionSuffix`] from prior runs.
//! - [`patcher`]: finds `Properties/AssemblyInfo.cs` files and rewrites them.
//! - [`history`] / [`github`]: where prior runs come from.
//! - [`stamp`]: ties the pieces together for a single CI invocation.

pub mod calculator;
pub mod config;
pub mod error;
pub mod github;
pub mod history;
pub mod patcher;
pub mod reporter;
pub mod stamp;
pub mod week;

pub use calculator::{AssemblyVersion, VersionSuffix};
pub use config::{Config, Repository};
pub use error::StampError;
pub use github::GitHubClient;
pub use history::{BuildRun, RunHistory};
pub use reporter::{NullReporter, Reporter};
pub use stamp::{StampReport, stamp};
pub use week::WeekKey;

/// User Agent string sent to the CI provider API
pub const USER_AGENT: &str = concat!("weekver/", env!("CARGO_PKG_VERSION"));
