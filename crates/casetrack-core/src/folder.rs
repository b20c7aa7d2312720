//! Folder-to-scenario generation.

use casetrack_error::{CaseTrackError, Result};
use casetrack_store::{EvidenceFiles, Store};
use casetrack_types::{FolderId, Scenario, ScenarioId};
use tracing::info;

use crate::Engine;

impl<S: Store, F: EvidenceFiles> Engine<S, F> {
    /// Build a new scenario from a folder's cases, preserving their display
    /// order with positions numbered contiguously from 0. The title
    /// defaults to the folder's name when no override is given.
    ///
    /// A folder with zero cases is rejected: an empty scenario has no
    /// execution order to preserve.
    pub fn scenario_from_folder(
        &self,
        folder_id: FolderId,
        title_override: Option<&str>,
    ) -> Result<ScenarioId> {
        let folder = self.store().get_folder(folder_id)?;
        let cases = self.store().cases_in_folder(folder_id)?;
        if cases.is_empty() {
            return Err(CaseTrackError::validation(format!(
                "folder {:?} has no cases to build a scenario from",
                folder.name
            )));
        }

        let title = title_override.unwrap_or(&folder.name);
        let mut scenario = Scenario::new(title);
        for case in &cases {
            scenario.push_case(case.id)?;
        }
        let id = self.save_scenario(scenario)?;
        info!(folder = %folder_id, scenario = %id, cases = cases.len(), "scenario generated from folder");
        Ok(id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
