//! The aggregation engine: pure read-side projections over run entries.
//!
//! Nothing here is ever stored. Progress and pass rates are recomputed from
//! current entry statuses on every read, so they cannot drift from the
//! entries themselves. The engine is infallible over its inputs: an empty
//! sequence summarizes to zeros, and a run with no case entries is 0%
//! complete rather than undefined.

use casetrack_error::Result;
use casetrack_store::{EvidenceFiles, Store};
use casetrack_types::{EntryStatus, RunCaseEntry, RunId, RunScenarioId, RunStatus};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::Engine;

// ---------------------------------------------------------------------------
// Pure projections
// ---------------------------------------------------------------------------

/// Rollup of a status sequence.
///
/// `completed` counts pass/fail/blocked; `remaining` counts not_run/skip.
/// Every status falls in exactly one partition, so
/// `completed + remaining == total` by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

/// Summarize a status sequence. Empty input yields `{0, 0, 0}`.
pub fn summarize(statuses: impl IntoIterator<Item = EntryStatus>) -> Summary {
    let mut summary = Summary::default();
    for status in statuses {
        summary.total += 1;
        if status.is_completed() {
            summary.completed += 1;
        } else {
            summary.remaining += 1;
        }
    }
    summary
}

/// Completion percentage, rounded to the nearest integer. 0 when empty.
#[must_use]
pub fn progress_percent(summary: Summary) -> u32 {
    if summary.total == 0 {
        return 0;
    }
    ((summary.completed as f64 / summary.total as f64) * 100.0).round() as u32
}

/// Per-status entry counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub not_run: usize,
    pub pass: usize,
    pub fail: usize,
    pub blocked: usize,
    pub skip: usize,
}

impl StatusCounts {
    pub fn tally(statuses: impl IntoIterator<Item = EntryStatus>) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            match status {
                EntryStatus::NotRun => counts.not_run += 1,
                EntryStatus::Pass => counts.pass += 1,
                EntryStatus::Fail => counts.fail += 1,
                EntryStatus::Blocked => counts.blocked += 1,
                EntryStatus::Skip => counts.skip += 1,
            }
        }
        counts
    }
}

/// Pass rate over the completed portion of a status sequence, as a
/// percentage. `None` when nothing is completed.
fn pass_rate(statuses: impl IntoIterator<Item = EntryStatus>) -> Option<f64> {
    let counts = StatusCounts::tally(statuses);
    let completed = counts.pass + counts.fail + counts.blocked;
    if completed == 0 {
        None
    } else {
        Some(counts.pass as f64 / completed as f64 * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// One run's row on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct RunProgress {
    pub run_id: RunId,
    pub name: String,
    pub status: RunStatus,
    pub summary: Summary,
    pub progress_percent: u32,
}

/// Project-wide rollup.
///
/// `pass_rate` and the per-status counts cover case entries of active runs
/// (status other than draft); drafts are staging areas and would drag the
/// rate toward zero before execution starts. `pass_rate_delta` compares the
/// trailing window against the window before it, keyed on `executed_at`.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub summary: Summary,
    pub counts: StatusCounts,
    pub pass_rate: Option<f64>,
    pub pass_rate_delta: Option<f64>,
    pub runs: Vec<RunProgress>,
}

impl<S: Store, F: EvidenceFiles> Engine<S, F> {
    /// Rollup over one scenario entry's case entries.
    pub fn scenario_entry_summary(&self, entry: RunScenarioId) -> Result<Summary> {
        self.store().get_run_scenario(entry)?;
        let entries = self.store().run_case_entries_of_run_scenario(entry)?;
        Ok(summarize(entries.iter().map(|e| e.status)))
    }

    /// Rollup over all case entries of a run, across its scenario entries.
    pub fn run_summary(&self, run: RunId) -> Result<Summary> {
        let entries = self.case_entries_of_run(run)?;
        Ok(summarize(entries.iter().map(|e| e.status)))
    }

    /// Completion percentage of a run. A run with no case entries is 0%.
    pub fn run_progress_percent(&self, run: RunId) -> Result<u32> {
        Ok(progress_percent(self.run_summary(run)?))
    }

    /// Project-wide dashboard as of `now`.
    pub fn dashboard(&self, now: DateTime<Utc>) -> Result<Dashboard> {
        let runs = self.store().list_runs()?;
        let window = Duration::days(self.config().pass_rate_window_days);

        let mut active_entries: Vec<RunCaseEntry> = Vec::new();
        let mut rows = Vec::with_capacity(runs.len());
        for run in &runs {
            let entries = self.case_entries_of_run(run.id)?;
            let summary = summarize(entries.iter().map(|e| e.status));
            rows.push(RunProgress {
                run_id: run.id,
                name: run.name.clone(),
                status: run.status,
                summary,
                progress_percent: progress_percent(summary),
            });
            if run.status != RunStatus::Draft {
                active_entries.extend(entries);
            }
        }

        let summary = summarize(active_entries.iter().map(|e| e.status));
        let counts = StatusCounts::tally(active_entries.iter().map(|e| e.status));
        let rate = pass_rate(active_entries.iter().map(|e| e.status));

        let current = windowed_rate(&active_entries, now - window, now);
        let prior = windowed_rate(&active_entries, now - window - window, now - window);
        let pass_rate_delta = match (current, prior) {
            (Some(c), Some(p)) => Some(c - p),
            _ => None,
        };

        Ok(Dashboard {
            summary,
            counts,
            pass_rate: rate,
            pass_rate_delta,
            runs: rows,
        })
    }

    fn case_entries_of_run(&self, run: RunId) -> Result<Vec<RunCaseEntry>> {
        self.store().get_run(run)?;
        let mut entries = Vec::new();
        for scenario_entry in self.store().run_scenario_entries_of_run(run)? {
            entries.extend(
                self.store()
                    .run_case_entries_of_run_scenario(scenario_entry.id)?,
            );
        }
        Ok(entries)
    }
}

/// Pass rate over entries executed within `(from, to]`.
fn windowed_rate(entries: &[RunCaseEntry], from: DateTime<Utc>, to: DateTime<Utc>) -> Option<f64> {
    pass_rate(
        entries
            .iter()
            .filter(|e| e.executed_at.is_some_and(|at| at > from && at <= to))
            .map(|e| e.status),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
