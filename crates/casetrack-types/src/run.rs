//! Test runs and their snapshot entries.
//!
//! A run owns its scenario entries exclusively; each scenario entry owns its
//! case entries. Entries reference the authored scenario/case only by id plus
//! copied display fields, so a run's history survives authoring edits.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CaseId, RunCaseId, RunId, RunScenarioId, ScenarioId};
use crate::status::{EntryStatus, RunStatus};

/// A named execution session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRun {
    pub id: RunId,
    pub name: String,
    pub environment: String,
    pub build_version: String,
    pub tester: String,
    pub status: RunStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub notes: String,
}

impl TestRun {
    /// New unsaved draft run.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RunId::UNSET,
            name: name.into(),
            environment: String::new(),
            build_version: String::new(),
            tester: String::new(),
            status: RunStatus::Draft,
            started_at: None,
            finished_at: None,
            notes: String::new(),
        }
    }
}

/// A run's frozen attachment of one scenario.
///
/// `status` is the scenario-level verdict set by the tester: an independent
/// field, never derived from the case entries (the aggregation engine is the
/// separate read path for "X% of its cases are done").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunScenarioEntry {
    pub id: RunScenarioId,
    pub run_id: RunId,
    /// Weak reference to the authored scenario.
    pub scenario_id: ScenarioId,
    /// Scenario title copied at attach time.
    pub title: String,
    pub status: EntryStatus,
    pub assignee: String,
    pub actual_result: String,
    pub notes: String,
    pub executed_at: Option<DateTime<Utc>>,
}

/// A run-scenario's frozen attachment of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCaseEntry {
    pub id: RunCaseId,
    pub run_scenario_id: RunScenarioId,
    /// Weak reference to the authored case.
    pub case_id: CaseId,
    /// Copied at attach time.
    pub case_title: String,
    /// Copied at attach time.
    pub preconditions: String,
    /// Copied at attach time.
    pub tags: BTreeSet<String>,
    pub status: EntryStatus,
    pub actual_result: String,
    pub notes: String,
    pub executed_at: Option<DateTime<Utc>>,
}
