//! Authored scenarios: ordered, named bundles of case references.

use casetrack_error::{CaseTrackError, Result};
use serde::{Deserialize, Serialize};

use crate::id::{CaseId, ScenarioId};

/// One slot of a scenario: a case reference plus its execution position.
///
/// Positions are contiguous from 0 and unique within a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioCase {
    pub case_id: CaseId,
    pub position: u32,
}

/// An authored scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub title: String,
    pub objective: String,
    /// Ordered case slots; kept sorted by position.
    pub cases: Vec<ScenarioCase>,
}

impl Scenario {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ScenarioId::UNSET,
            title: title.into(),
            objective: String::new(),
            cases: Vec::new(),
        }
    }

    /// Case ids in execution order.
    #[must_use]
    pub fn case_ids(&self) -> Vec<CaseId> {
        self.cases.iter().map(|sc| sc.case_id).collect()
    }

    /// Whether the scenario already references `case_id`.
    #[must_use]
    pub fn contains_case(&self, case_id: CaseId) -> bool {
        self.cases.iter().any(|sc| sc.case_id == case_id)
    }

    /// Append a case at the next position.
    ///
    /// # Errors
    /// Rejects a case id already present in the scenario.
    pub fn push_case(&mut self, case_id: CaseId) -> Result<()> {
        if self.contains_case(case_id) {
            return Err(CaseTrackError::validation(format!(
                "case {case_id} is already part of scenario {:?}",
                self.title
            )));
        }
        let position = self.cases.len() as u32;
        self.cases.push(ScenarioCase { case_id, position });
        Ok(())
    }

    /// Remove a case reference and re-close the position gap.
    ///
    /// # Errors
    /// `NotFound` if the case is not part of the scenario.
    pub fn remove_case(&mut self, case_id: CaseId) -> Result<()> {
        let idx = self
            .cases
            .iter()
            .position(|sc| sc.case_id == case_id)
            .ok_or_else(|| CaseTrackError::not_found("scenario case", case_id.raw()))?;
        self.cases.remove(idx);
        self.renumber();
        Ok(())
    }

    /// Move the slot at `from` to `to`, shifting the slots in between.
    ///
    /// # Errors
    /// `ValidationFailed` if either index is out of bounds.
    pub fn move_case(&mut self, from: usize, to: usize) -> Result<()> {
        if from >= self.cases.len() || to >= self.cases.len() {
            return Err(CaseTrackError::validation(format!(
                "move {from} -> {to} out of bounds for {} cases",
                self.cases.len()
            )));
        }
        let slot = self.cases.remove(from);
        self.cases.insert(to, slot);
        self.renumber();
        Ok(())
    }

    /// Whether positions are contiguous from 0 and unique.
    #[must_use]
    pub fn positions_contiguous(&self) -> bool {
        self.cases
            .iter()
            .enumerate()
            .all(|(i, sc)| sc.position == i as u32)
    }

    fn renumber(&mut self) {
        for (i, slot) in self.cases.iter_mut().enumerate() {
            slot.position = i as u32;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
