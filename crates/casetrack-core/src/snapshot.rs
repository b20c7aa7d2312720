//! The run snapshot engine.
//!
//! Attaching a scenario to a run captures the scenario's current shape into
//! run-owned entries: one [`RunScenarioEntry`] plus one [`RunCaseEntry`] per
//! case, each carrying a value copy of the fields the run will display.
//! From that point on the authored scenario and the run entries evolve
//! independently; editing or deleting the source never rewrites a run.

use casetrack_error::{CaseTrackError, Result};
use casetrack_store::{EvidenceFiles, Store};
use casetrack_types::{
    EntryStatus, RunCaseEntry, RunCaseId, RunId, RunScenarioEntry, RunScenarioId, Scenario,
    ScenarioId, TestRun,
};
use tracing::{info, warn};

use crate::Engine;

/// How the caller names the run to attach into.
///
/// `Draft` realizes the "save the run if unsaved, then attach" flow: the
/// caller-supplied run record is persisted first, then attached into.
#[derive(Debug, Clone)]
pub enum RunHandle {
    /// An already-saved run.
    Existing(RunId),
    /// An unsaved run record to create as part of the attach.
    Draft(TestRun),
}

impl From<RunId> for RunHandle {
    fn from(id: RunId) -> Self {
        Self::Existing(id)
    }
}

impl<S: Store, F: EvidenceFiles> Engine<S, F> {
    /// Attach a scenario to a run, snapshotting its cases.
    ///
    /// The scenario and every case it references are resolved before
    /// anything is written; a missing case fails the whole attach. A
    /// scenario already attached to the run is rejected: a run holds at
    /// most one entry per scenario id.
    pub fn attach_scenario(
        &self,
        run: RunHandle,
        scenario_id: ScenarioId,
        default_assignee: Option<&str>,
    ) -> Result<RunScenarioId> {
        let scenario = self.store().get_scenario(scenario_id)?;
        let cases = self.store().cases_of_scenario(scenario_id)?;

        let run_id = match run {
            RunHandle::Existing(id) => self.store().get_run(id)?.id,
            RunHandle::Draft(record) => {
                if record.id.is_set() {
                    return Err(CaseTrackError::validation(
                        "draft run handle carries an already-assigned id",
                    ));
                }
                self.save_run(record)?
            }
        };

        if self.store().find_run_scenario(run_id, scenario_id)?.is_some() {
            return Err(CaseTrackError::validation(format!(
                "scenario {scenario_id} is already attached to run {run_id}"
            )));
        }

        let assignee = default_assignee
            .or(self.config().default_assignee.as_deref())
            .unwrap_or("")
            .to_owned();

        let entry_id = self.store().save_run_scenario(RunScenarioEntry {
            id: RunScenarioId::UNSET,
            run_id,
            scenario_id,
            title: scenario.title.clone(),
            status: EntryStatus::NotRun,
            assignee: assignee.clone(),
            actual_result: String::new(),
            notes: String::new(),
            executed_at: None,
        })?;

        // Case entries in scenario order. If one insert fails, roll the
        // whole entry back so no partial snapshot is ever visible.
        for case in &cases {
            let result = self.store().save_run_case(RunCaseEntry {
                id: RunCaseId::UNSET,
                run_scenario_id: entry_id,
                case_id: case.id,
                case_title: case.title.clone(),
                preconditions: case.preconditions.clone(),
                tags: case.tags.clone(),
                status: EntryStatus::NotRun,
                actual_result: String::new(),
                notes: String::new(),
                executed_at: None,
            });
            if let Err(e) = result {
                warn!(run = %run_id, scenario = %scenario_id, "attach failed, rolling back entry");
                self.store().delete_run_scenario(entry_id)?;
                return Err(e);
            }
        }

        info!(
            run = %run_id,
            scenario = %scenario_id,
            cases = cases.len(),
            "scenario attached"
        );
        Ok(entry_id)
    }

    /// Scenarios offered for attachment: everything not already attached to
    /// the run.
    pub fn attachable_scenarios(&self, run: RunId) -> Result<Vec<Scenario>> {
        self.store().get_run(run)?;
        let attached: Vec<ScenarioId> = self
            .store()
            .run_scenario_entries_of_run(run)?
            .into_iter()
            .map(|e| e.scenario_id)
            .collect();
        Ok(self
            .store()
            .list_scenarios()?
            .into_iter()
            .filter(|s| !attached.contains(&s.id))
            .collect())
    }

    /// Detach a scenario entry from its run: the entry, its case entries,
    /// and all their evidence are deleted. No undo.
    pub fn remove_scenario(&self, entry: RunScenarioId) -> Result<()> {
        self.store().get_run_scenario(entry)?;
        let refs = self.collect_evidence_refs(entry)?;
        self.store().delete_run_scenario(entry)?;
        for stored_ref in refs {
            self.files().remove(&stored_ref)?;
        }
        info!(entry = %entry, "scenario entry removed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
