//! CaseTrack: the test-management core.
//!
//! A test team authors reusable cases and scenarios, attaches initial data,
//! executes scenarios under named runs, and records results with evidence.
//! This crate is the public face of the workspace: it re-exports the engine,
//! the record types, the collaborator traits, and the reference
//! implementations, so embedders depend on one crate.
//!
//! ```
//! use casetrack::prelude::*;
//!
//! let engine = Engine::new(MemoryStore::new(), MemEvidenceFiles::new());
//! let now = chrono::Utc::now();
//!
//! let case = engine.save_case(TestCase::new("Login succeeds", now), now).unwrap();
//! let mut scenario = Scenario::new("Auth smoke");
//! scenario.push_case(case).unwrap();
//! let scenario = engine.save_scenario(scenario).unwrap();
//!
//! let entry = engine
//!     .attach_scenario(RunHandle::Draft(TestRun::new("RC-1")), scenario, None)
//!     .unwrap();
//! let summary = engine.scenario_entry_summary(entry).unwrap();
//! assert_eq!((summary.total, summary.completed), (1, 0));
//! ```

pub use casetrack_core::{
    CaseResultPatch, Dashboard, Engine, EngineConfig, RunHandle, RunProgress,
    ScenarioResultPatch, StatusCounts, Summary, progress_percent, summarize,
};
pub use casetrack_error::{CaseTrackError, Result};
pub use casetrack_store::{
    ContentSniffer, DirEvidenceFiles, EvidenceFiles, HeuristicSniffer, MemEvidenceFiles,
    MemoryStore, Preview, SniffFormat, SniffReport, Store,
};
pub use casetrack_types::{
    CaseFolder, CaseId, DataItem, DataLink, DataScope, DataSet, DataSetId, EntityKind,
    EntryStatus, Evidence, EvidenceId, EvidenceOwner, FolderId, Priority, RunCaseEntry,
    RunCaseId, RunId, RunScenarioEntry, RunScenarioId, RunStatus, Scenario, ScenarioCase,
    ScenarioId, Severity, TestCase, TestRun, TestStep,
};

/// Everything an embedder typically needs in scope.
pub mod prelude {
    pub use super::{
        CaseFolder, CaseResultPatch, CaseTrackError, DataScope, DataSet, Engine, EngineConfig,
        EntityKind, EntryStatus, EvidenceOwner, MemEvidenceFiles, MemoryStore, Result, RunHandle,
        RunStatus, Scenario, ScenarioResultPatch, Store, TestCase, TestRun, TestStep,
    };
}

/// Install a global `tracing` subscriber honoring `RUST_LOG`, for binaries
/// embedding the engine. Safe to call once per process.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
