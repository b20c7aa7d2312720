//! Authoring operations: validated CRUD for cases, folders, scenarios,
//! datasets, and runs, plus scenario composition.
//!
//! All user edits to the authored model flow through here so required-field
//! validation is uniform and always precedes the write. Run snapshots are
//! never touched by anything in this module.

use casetrack_error::{CaseTrackError, Result};
use casetrack_store::{EvidenceFiles, Store};
use casetrack_types::{
    CaseFolder, CaseId, DataSet, DataSetId, EvidenceOwner, FolderId, RunId, Scenario, ScenarioId,
    TestCase, TestRun,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::Engine;
use crate::dataset::validate_links;

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CaseTrackError::validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

impl<S: Store, F: EvidenceFiles> Engine<S, F> {
    // --- cases ---

    /// Create or update a case. Stamps `created_at` on first save and
    /// `updated_at` on every save.
    pub fn save_case(&self, mut case: TestCase, now: DateTime<Utc>) -> Result<CaseId> {
        require("case title", &case.title)?;
        if let Some(folder) = case.folder_id {
            self.store().get_folder(folder)?;
        }
        if !case.id.is_set() {
            case.created_at = now;
        }
        case.updated_at = now;
        self.store().save_case(case)
    }

    /// Delete a case and strip its references from every authored scenario,
    /// re-closing position gaps. Run snapshots that captured the case are
    /// left as they are.
    pub fn delete_case(&self, id: CaseId) -> Result<()> {
        self.store().get_case(id)?;
        for mut scenario in self.store().list_scenarios()? {
            if scenario.contains_case(id) {
                scenario.remove_case(id)?;
                self.store().save_scenario(scenario)?;
            }
        }
        self.store().delete_case(id)?;
        info!(case = %id, "case deleted");
        Ok(())
    }

    // --- folders ---

    pub fn save_folder(&self, folder: CaseFolder) -> Result<FolderId> {
        require("folder name", &folder.name)?;
        self.store().save_folder(folder)
    }

    /// Delete a folder; member cases are unfiled, not deleted.
    pub fn delete_folder(&self, id: FolderId) -> Result<()> {
        self.store().delete_folder(id)
    }

    // --- scenarios ---

    /// Create or update a scenario. The case sequence must have contiguous
    /// unique positions and every referenced case must exist.
    pub fn save_scenario(&self, scenario: Scenario) -> Result<ScenarioId> {
        require("scenario title", &scenario.title)?;
        if !scenario.positions_contiguous() {
            return Err(CaseTrackError::validation(
                "scenario case positions must be contiguous from 0",
            ));
        }
        for slot in &scenario.cases {
            self.store().get_case(slot.case_id)?;
        }
        self.store().save_scenario(scenario)
    }

    pub fn delete_scenario(&self, id: ScenarioId) -> Result<()> {
        self.store().delete_scenario(id)
    }

    /// Append a case to a scenario's execution order.
    pub fn add_case_to_scenario(&self, scenario: ScenarioId, case: CaseId) -> Result<()> {
        let mut record = self.store().get_scenario(scenario)?;
        self.store().get_case(case)?;
        record.push_case(case)?;
        self.store().save_scenario(record)?;
        debug!(scenario = %scenario, case = %case, "case added to scenario");
        Ok(())
    }

    /// Remove a case from a scenario; remaining positions re-close the gap.
    pub fn remove_case_from_scenario(&self, scenario: ScenarioId, case: CaseId) -> Result<()> {
        let mut record = self.store().get_scenario(scenario)?;
        record.remove_case(case)?;
        self.store().save_scenario(record)?;
        Ok(())
    }

    /// Reorder a scenario by moving the slot at `from` to `to`.
    pub fn move_scenario_case(&self, scenario: ScenarioId, from: usize, to: usize) -> Result<()> {
        let mut record = self.store().get_scenario(scenario)?;
        record.move_case(from, to)?;
        self.store().save_scenario(record)?;
        Ok(())
    }

    // --- datasets ---

    /// Create or update a dataset. Carried links must satisfy the scope
    /// invariant, exactly as [`Engine::set_links`] enforces it.
    pub fn save_dataset(&self, dataset: DataSet) -> Result<DataSetId> {
        require("dataset name", &dataset.name)?;
        validate_links(self.store(), dataset.scope, &dataset.links)?;
        self.store().save_dataset(dataset)
    }

    pub fn delete_dataset(&self, id: DataSetId) -> Result<()> {
        self.store().delete_dataset(id)
    }

    // --- runs ---

    pub fn save_run(&self, run: TestRun) -> Result<RunId> {
        require("run name", &run.name)?;
        self.store().save_run(run)
    }

    /// Delete a run: its scenario entries, case entries, and evidence rows
    /// go with it, then the stored evidence bytes are released.
    pub fn delete_run(&self, id: RunId) -> Result<()> {
        let mut refs = Vec::new();
        for entry in self.store().run_scenario_entries_of_run(id)? {
            refs.extend(self.collect_evidence_refs(entry.id)?);
        }
        self.store().delete_run(id)?;
        for stored_ref in refs {
            self.files().remove(&stored_ref)?;
        }
        Ok(())
    }

    /// Stored refs of all evidence under one run scenario entry.
    pub(crate) fn collect_evidence_refs(
        &self,
        entry: casetrack_types::RunScenarioId,
    ) -> Result<Vec<String>> {
        let mut refs: Vec<String> = self
            .store()
            .evidence_of(EvidenceOwner::ScenarioEntry(entry))?
            .into_iter()
            .map(|ev| ev.stored_ref)
            .collect();
        for case_entry in self.store().run_case_entries_of_run_scenario(entry)? {
            refs.extend(
                self.store()
                    .evidence_of(EvidenceOwner::CaseEntry(case_entry.id))?
                    .into_iter()
                    .map(|ev| ev.stored_ref),
            );
        }
        Ok(refs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
