//! Authored test cases, steps, and folders.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CaseId, FolderId};
use crate::status::{Priority, Severity};

/// One step of a test case: what to do and what should happen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub action: String,
    pub expected: String,
}

impl TestStep {
    #[must_use]
    pub fn new(action: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            expected: expected.into(),
        }
    }
}

/// An authored, reusable test case.
///
/// Deleting a case never retroactively alters run snapshots that already
/// captured it; run entries hold a value copy of the fields they display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: CaseId,
    pub title: String,
    pub objective: String,
    pub preconditions: String,
    pub priority: Priority,
    pub severity: Severity,
    /// Unordered label set.
    pub tags: BTreeSet<String>,
    /// At most one folder; `None` means unfiled.
    pub folder_id: Option<FolderId>,
    /// Ordered steps.
    pub steps: Vec<TestStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TestCase {
    /// New unsaved case with the given title; both timestamps start at `now`.
    #[must_use]
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: CaseId::UNSET,
            title: title.into(),
            objective: String::new(),
            preconditions: String::new(),
            priority: Priority::default(),
            severity: Severity::default(),
            tags: BTreeSet::new(),
            folder_id: None,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A flat (non-nested) grouping of cases.
///
/// Cases reference the folder, not the other way around; deleting a folder
/// un-sets that reference and leaves the cases in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFolder {
    pub id: FolderId,
    pub name: String,
}

impl CaseFolder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FolderId::UNSET,
            name: name.into(),
        }
    }
}
