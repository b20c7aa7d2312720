//! The result state machine.
//!
//! Entry statuses are free-form: any state may move to any other while the
//! run exists, so a mistaken verdict is corrected by setting the right one.
//! Scenario-level status is its own field; updating a case entry never
//! touches the parent entry's verdict, and "how many of its cases are done"
//! is the aggregation engine's job, not a stored value.

use casetrack_error::Result;
use casetrack_store::{EvidenceFiles, Store};
use casetrack_types::{EntryStatus, RunCaseEntry, RunCaseId, RunId, RunScenarioEntry, RunScenarioId, RunStatus};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::Engine;

/// Partial update for a [`RunScenarioEntry`]. Absent fields are untouched;
/// `executed_at` distinguishes "leave" (`None`) from "clear"
/// (`Some(None)`) and "set" (`Some(Some(t))`).
#[derive(Debug, Clone, Default)]
pub struct ScenarioResultPatch {
    pub status: Option<EntryStatus>,
    pub assignee: Option<String>,
    pub actual_result: Option<String>,
    pub notes: Option<String>,
    pub executed_at: Option<Option<DateTime<Utc>>>,
}

/// Partial update for a [`RunCaseEntry`].
#[derive(Debug, Clone, Default)]
pub struct CaseResultPatch {
    pub status: Option<EntryStatus>,
    pub actual_result: Option<String>,
    pub notes: Option<String>,
    pub executed_at: Option<Option<DateTime<Utc>>>,
}

impl CaseResultPatch {
    /// Patch that records a verdict and stamps the execution time.
    #[must_use]
    pub fn executed(status: EntryStatus, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            executed_at: Some(Some(at)),
            ..Self::default()
        }
    }
}

impl<S: Store, F: EvidenceFiles> Engine<S, F> {
    /// Apply a partial update to a scenario entry's own verdict fields.
    pub fn update_scenario_result(
        &self,
        id: RunScenarioId,
        patch: ScenarioResultPatch,
    ) -> Result<RunScenarioEntry> {
        let mut entry = self.store().get_run_scenario(id)?;
        if let Some(status) = patch.status {
            debug!(entry = %id, from = %entry.status, to = %status, "scenario status updated");
            entry.status = status;
        }
        if let Some(assignee) = patch.assignee {
            entry.assignee = assignee;
        }
        if let Some(actual) = patch.actual_result {
            entry.actual_result = actual;
        }
        if let Some(notes) = patch.notes {
            entry.notes = notes;
        }
        if let Some(executed_at) = patch.executed_at {
            entry.executed_at = executed_at;
        }
        self.store().save_run_scenario(entry.clone())?;
        Ok(entry)
    }

    /// Apply a partial update to a case entry. The parent scenario entry is
    /// never modified.
    pub fn update_case_result(
        &self,
        id: RunCaseId,
        patch: CaseResultPatch,
    ) -> Result<RunCaseEntry> {
        let mut entry = self.store().get_run_case(id)?;
        if let Some(status) = patch.status {
            debug!(entry = %id, from = %entry.status, to = %status, "case status updated");
            entry.status = status;
        }
        if let Some(actual) = patch.actual_result {
            entry.actual_result = actual;
        }
        if let Some(notes) = patch.notes {
            entry.notes = notes;
        }
        if let Some(executed_at) = patch.executed_at {
            entry.executed_at = executed_at;
        }
        self.store().save_run_case(entry.clone())?;
        Ok(entry)
    }

    /// Record a verdict on a case entry and stamp `executed_at` in one
    /// step. A convenience over [`Engine::update_case_result`], not a
    /// distinct state.
    pub fn mark_case_executed(
        &self,
        id: RunCaseId,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> Result<RunCaseEntry> {
        self.update_case_result(id, CaseResultPatch::executed(status, now))
    }

    /// Scenario-entry twin of [`Engine::mark_case_executed`].
    pub fn mark_scenario_executed(
        &self,
        id: RunScenarioId,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> Result<RunScenarioEntry> {
        self.update_scenario_result(
            id,
            ScenarioResultPatch {
                status: Some(status),
                executed_at: Some(Some(now)),
                ..ScenarioResultPatch::default()
            },
        )
    }

    // --- run lifecycle ---

    /// Move a run into `in_progress`; `started_at` is stamped once.
    pub fn start_run(&self, id: RunId, now: DateTime<Utc>) -> Result<()> {
        let mut run = self.store().get_run(id)?;
        run.status = RunStatus::InProgress;
        run.started_at.get_or_insert(now);
        self.store().save_run(run)?;
        Ok(())
    }

    /// Mark a run `completed` and stamp `finished_at`.
    pub fn complete_run(&self, id: RunId, now: DateTime<Utc>) -> Result<()> {
        let mut run = self.store().get_run(id)?;
        run.status = RunStatus::Completed;
        run.started_at.get_or_insert(now);
        run.finished_at = Some(now);
        self.store().save_run(run)?;
        Ok(())
    }

    /// Reopen a completed run for further edits.
    pub fn reopen_run(&self, id: RunId) -> Result<()> {
        let mut run = self.store().get_run(id)?;
        run.status = RunStatus::InProgress;
        run.finished_at = None;
        self.store().save_run(run)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use casetrack_store::{MemEvidenceFiles, MemoryStore, Store};
    use casetrack_types::{EntryStatus, RunStatus, Scenario, TestCase, TestRun};
    use chrono::{TimeZone, Utc};

    use super::{CaseResultPatch, ScenarioResultPatch};
    use crate::snapshot::RunHandle;
    use crate::Engine;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, 9, 30, 0).unwrap()
    }

    struct Fixture {
        engine: Engine<MemoryStore, MemEvidenceFiles>,
        entry: casetrack_types::RunScenarioId,
        case_entry: casetrack_types::RunCaseId,
    }

    fn fixture() -> Fixture {
        let engine = Engine::new(MemoryStore::new(), MemEvidenceFiles::new());
        let case = engine.save_case(TestCase::new("login", now()), now()).unwrap();
        let mut scenario = Scenario::new("auth");
        scenario.push_case(case).unwrap();
        let scenario = engine.save_scenario(scenario).unwrap();
        let run = engine.save_run(TestRun::new("r1")).unwrap();
        let entry = engine
            .attach_scenario(RunHandle::Existing(run), scenario, None)
            .unwrap();
        let case_entry = engine.store().run_case_entries_of_run_scenario(entry).unwrap()[0].id;
        Fixture {
            engine,
            entry,
            case_entry,
        }
    }

    // === Test: any state may move to any other ===
    #[test]
    fn test_free_form_transitions() {
        let f = fixture();
        for status in [
            EntryStatus::Pass,
            EntryStatus::Fail,
            EntryStatus::NotRun,
            EntryStatus::Blocked,
            EntryStatus::Skip,
            EntryStatus::Pass,
        ] {
            let entry = f
                .engine
                .update_case_result(
                    f.case_entry,
                    CaseResultPatch {
                        status: Some(status),
                        ..CaseResultPatch::default()
                    },
                )
                .unwrap();
            assert_eq!(entry.status, status);
        }
    }

    // === Test: case updates never touch the parent entry's verdict ===
    #[test]
    fn test_case_update_leaves_scenario_status() {
        let f = fixture();
        f.engine
            .mark_case_executed(f.case_entry, EntryStatus::Pass, now())
            .unwrap();
        let parent = f.engine.store().get_run_scenario(f.entry).unwrap();
        assert_eq!(parent.status, EntryStatus::NotRun);
        assert_eq!(parent.executed_at, None);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let f = fixture();
        f.engine
            .update_case_result(
                f.case_entry,
                CaseResultPatch {
                    notes: Some("flaky on staging".to_owned()),
                    ..CaseResultPatch::default()
                },
            )
            .unwrap();
        let entry = f.engine.store().get_run_case(f.case_entry).unwrap();
        assert_eq!(entry.notes, "flaky on staging");
        assert_eq!(entry.status, EntryStatus::NotRun);
        assert_eq!(entry.actual_result, "");
    }

    #[test]
    fn test_executed_at_set_and_clear() {
        let f = fixture();
        let t = now();
        f.engine.mark_case_executed(f.case_entry, EntryStatus::Fail, t).unwrap();
        assert_eq!(f.engine.store().get_run_case(f.case_entry).unwrap().executed_at, Some(t));

        f.engine
            .update_case_result(
                f.case_entry,
                CaseResultPatch {
                    executed_at: Some(None),
                    ..CaseResultPatch::default()
                },
            )
            .unwrap();
        assert_eq!(f.engine.store().get_run_case(f.case_entry).unwrap().executed_at, None);
    }

    #[test]
    fn test_scenario_verdict_is_separate() {
        let f = fixture();
        f.engine
            .update_scenario_result(
                f.entry,
                ScenarioResultPatch {
                    status: Some(EntryStatus::Blocked),
                    assignee: Some("robin".to_owned()),
                    ..ScenarioResultPatch::default()
                },
            )
            .unwrap();
        let entry = f.engine.store().get_run_scenario(f.entry).unwrap();
        assert_eq!(entry.status, EntryStatus::Blocked);
        assert_eq!(entry.assignee, "robin");
        // The child case entry is untouched.
        let case = f.engine.store().get_run_case(f.case_entry).unwrap();
        assert_eq!(case.status, EntryStatus::NotRun);
    }

    #[test]
    fn test_update_missing_entry() {
        let f = fixture();
        let err = f
            .engine
            .update_case_result(casetrack_types::RunCaseId::new(404), CaseResultPatch::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    // === Test: run lifecycle stamps ===
    #[test]
    fn test_run_lifecycle() {
        let f = fixture();
        let run_id = f.engine.store().get_run_scenario(f.entry).unwrap().run_id;
        let t0 = now();
        f.engine.start_run(run_id, t0).unwrap();
        let run = f.engine.store().get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::InProgress);
        assert_eq!(run.started_at, Some(t0));

        let t1 = t0 + chrono::Duration::hours(2);
        f.engine.complete_run(run_id, t1).unwrap();
        let run = f.engine.store().get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.started_at, Some(t0));
        assert_eq!(run.finished_at, Some(t1));

        f.engine.reopen_run(run_id).unwrap();
        let run = f.engine.store().get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::InProgress);
        assert_eq!(run.finished_at, None);
    }
}
