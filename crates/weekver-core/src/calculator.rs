//! Version calculator
//!
//! A build is numbered `major.yy.week.build` where `build` counts runs of the
//! pipeline since the first run of the current week.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::history::BuildRun;
use crate::week::WeekKey;

/// The computed `yy.week.build` part of a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionSuffix {
    /// Two-digit year.
    pub year: u32,
    /// Week of the year, 1-based.
    pub week: u32,
    /// Index of this run within the week, starting at 0.
    pub build: u64,
}

impl VersionSuffix {
    /// Derive the suffix for the run numbered `current` happening at `now`.
    ///
    /// `runs` is the pipeline's history. Only runs in the same [`WeekKey`] as
    /// `now` are considered; the lowest sequence number among them is the
    /// first run of the week. With no such run the current run is the first.
    pub fn calculate(now: DateTime<Utc>, current: u64, runs: &[BuildRun]) -> Self {
        let key = WeekKey::of(now);
        let first_of_week = runs
            .iter()
            .filter(|run| WeekKey::of(run.created_at) == key)
            .map(|run| run.number)
            .min()
            .unwrap_or(current);

        Self {
            year: key.short_year(),
            week: key.week,
            build: current.saturating_sub(first_of_week),
        }
    }
}

impl fmt::Display for VersionSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.year, self.week, self.build)
    }
}

/// A full four-part assembly version: preserved major plus computed suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyVersion {
    /// Major component taken verbatim from the existing declaration.
    pub major: String,
    /// Computed remainder.
    pub suffix: VersionSuffix,
}

impl AssemblyVersion {
    /// Combine an existing major version with a computed suffix.
    pub fn new(major: impl Into<String>, suffix: VersionSuffix) -> Self {
        Self {
            major: major.into(),
            suffix,
        }
    }

    /// The C# attribute line declaring this version.
    pub fn declaration(&self) -> String {
        format!("[assembly: AssemblyVersion(\"{self}\")]")
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.suffix)
    }
}
