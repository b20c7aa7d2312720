//! Core type definitions for CaseTrack.
//!
//! Everything the engines and the persistence seam exchange lives here:
//! id newtypes, the closed status/scope vocabularies, and the record structs
//! for authored entities (cases, folders, scenarios, datasets, runs) and for
//! run snapshots (scenario entries, case entries, evidence).
//!
//! Run entries reference authored entities by id plus a copied label (a
//! weak reference, never a live pointer), so authored records can be edited
//! or deleted without corrupting run history.

pub mod case;
pub mod dataset;
pub mod evidence;
pub mod id;
pub mod run;
pub mod scenario;
pub mod status;

pub use case::{CaseFolder, TestCase, TestStep};
pub use dataset::{DataItem, DataLink, DataSet};
pub use evidence::{Evidence, EvidenceOwner};
pub use id::{
    CaseId, DataSetId, EvidenceId, FolderId, RunCaseId, RunId, RunScenarioId, ScenarioId,
};
pub use run::{RunCaseEntry, RunScenarioEntry, TestRun};
pub use scenario::{Scenario, ScenarioCase};
pub use status::{DataScope, EntityKind, EntryStatus, Priority, RunStatus, Severity};
