//! Closed status and scope vocabularies.
//!
//! Every enum here is a closed set: parsing a string outside the set is a
//! validation error, not an extensible vocabulary. The string forms are the
//! wire/storage representation (snake_case).

use std::fmt;
use std::str::FromStr;

use casetrack_error::CaseTrackError;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entry status (run-scenario and run-case entries share the enum)
// ---------------------------------------------------------------------------

/// Execution status of a run entry.
///
/// Any state may transition to any other while the run exists; corrections
/// are free-form, this is not a forward-only machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Not executed yet.
    #[default]
    NotRun,
    /// Executed and passed.
    Pass,
    /// Executed and failed.
    Fail,
    /// Execution was blocked by an external condition.
    Blocked,
    /// Deliberately skipped.
    Skip,
}

impl EntryStatus {
    /// All values, in display order.
    pub const ALL: [Self; 5] = [Self::NotRun, Self::Pass, Self::Fail, Self::Blocked, Self::Skip];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRun => "not_run",
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Blocked => "blocked",
            Self::Skip => "skip",
        }
    }

    /// Whether this status counts as completed for progress rollups.
    ///
    /// `pass`, `fail` and `blocked` are completed; `not_run` and `skip` are
    /// remaining. Every status falls in exactly one of the two partitions.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Pass | Self::Fail | Self::Blocked)
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = CaseTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_run" => Ok(Self::NotRun),
            "pass" => Ok(Self::Pass),
            "fail" => Ok(Self::Fail),
            "blocked" => Ok(Self::Blocked),
            "skip" => Ok(Self::Skip),
            other => Err(CaseTrackError::validation(format!(
                "invalid entry status: {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Run status
// ---------------------------------------------------------------------------

/// Lifecycle status of a test run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Created but not started; excluded from dashboard pass rates.
    #[default]
    Draft,
    /// Execution in progress.
    InProgress,
    /// Execution finished.
    Completed,
}

impl RunStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = CaseTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(CaseTrackError::validation(format!(
                "invalid run status: {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority / severity
// ---------------------------------------------------------------------------

/// Authoring priority of a test case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Severity of the behavior a test case guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset scope and link targets
// ---------------------------------------------------------------------------

/// The kind of entity a dataset may be linked to.
///
/// `common` datasets have no links and apply universally; each other scope
/// links only to entities of the matching kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataScope {
    #[default]
    Common,
    Case,
    Scenario,
    Run,
}

impl DataScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Case => "case",
            Self::Scenario => "scenario",
            Self::Run => "run",
        }
    }

    /// Whether a link targeting `kind` is legal under this scope.
    #[must_use]
    pub const fn permits(self, kind: EntityKind) -> bool {
        matches!(
            (self, kind),
            (Self::Case, EntityKind::Case)
                | (Self::Scenario, EntityKind::Scenario)
                | (Self::Run, EntityKind::Run)
        )
    }
}

impl fmt::Display for DataScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataScope {
    type Err = CaseTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Self::Common),
            "case" => Ok(Self::Case),
            "scenario" => Ok(Self::Scenario),
            "run" => Ok(Self::Run),
            other => Err(CaseTrackError::validation(format!(
                "invalid dataset scope: {other:?}"
            ))),
        }
    }
}

/// Kind discriminator for entities addressable across seams (data links,
/// content sniffing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Case,
    Folder,
    Scenario,
    DataSet,
    Run,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Folder => "folder",
            Self::Scenario => "scenario",
            Self::DataSet => "data_set",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
