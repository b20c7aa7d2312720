//! Evidence rows: user-attached files documenting a result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{EvidenceId, RunCaseId, RunScenarioId};

/// The entry an evidence row belongs to. Attachment points are disjoint:
/// a row is owned by a scenario entry or a case entry, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EvidenceOwner {
    ScenarioEntry(RunScenarioId),
    CaseEntry(RunCaseId),
}

/// A user-attached file (often a screenshot) documenting a result.
///
/// Created by explicit add/paste, deleted explicitly or by cascade when
/// the owning entry is deleted. Authoring edits never touch evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: EvidenceId,
    pub owner: EvidenceOwner,
    pub file_name: String,
    /// Opaque reference into the file-content collaborator.
    pub stored_ref: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_serde_tagging() {
        let owner = EvidenceOwner::CaseEntry(RunCaseId::new(9));
        let json = serde_json::to_string(&owner).unwrap();
        assert_eq!(json, r#"{"kind":"case_entry","id":9}"#);
        let back: EvidenceOwner = serde_json::from_str(&json).unwrap();
        assert_eq!(back, owner);
    }
}
