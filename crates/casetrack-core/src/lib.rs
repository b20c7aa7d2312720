//! The CaseTrack engine.
//!
//! [`Engine`] is the complete API surface the interactive layer talks to:
//! authoring CRUD, the run snapshot engine, the result state machine,
//! dataset scoping, the folder-to-scenario generator, evidence handling,
//! and the read-side aggregation projections. It owns nothing but its two
//! collaborators (a [`Store`] for records and an [`EvidenceFiles`] for
//! evidence bytes) and a small [`EngineConfig`].
//!
//! Every mutating operation validates before it writes; a returned error
//! means the store was not touched by that operation (cascading deletes are
//! all-or-nothing on the store side). The engine never reads the wall
//! clock: operations that stamp a time take `now` from the caller.

pub mod aggregate;
pub mod authoring;
pub mod config;
pub mod dataset;
pub mod evidence;
pub mod folder;
pub mod results;
pub mod snapshot;

use casetrack_store::{EvidenceFiles, Store};

pub use aggregate::{Dashboard, RunProgress, StatusCounts, Summary, progress_percent, summarize};
pub use config::EngineConfig;
pub use results::{CaseResultPatch, ScenarioResultPatch};
pub use snapshot::RunHandle;

/// The engine over a persistence collaborator `S` and a file-content
/// collaborator `F`.
#[derive(Debug)]
pub struct Engine<S, F> {
    store: S,
    files: F,
    config: EngineConfig,
}

impl<S: Store, F: EvidenceFiles> Engine<S, F> {
    /// Engine with default configuration.
    pub fn new(store: S, files: F) -> Self {
        Self::with_config(store, files, EngineConfig::default())
    }

    pub fn with_config(store: S, files: F, config: EngineConfig) -> Self {
        Self {
            store,
            files,
            config,
        }
    }

    /// The persistence collaborator, for read paths the engine does not wrap.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn files(&self) -> &F {
        &self.files
    }
}
