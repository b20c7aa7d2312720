//! Evidence handling: attach, preview, remove.
//!
//! The engine keeps the [`Evidence`] rows; the file-content collaborator
//! keeps the bytes. Rows are only ever created against a live run entry and
//! only ever removed explicitly or by the owning entry's cascade; authoring
//! edits never touch them.

use casetrack_error::Result;
use casetrack_store::{EvidenceFiles, Preview, Store};
use casetrack_types::{Evidence, EvidenceId, EvidenceOwner};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::Engine;

impl<S: Store, F: EvidenceFiles> Engine<S, F> {
    /// Attach a picked file as evidence on a run entry.
    pub fn add_evidence_file(
        &self,
        owner: EvidenceOwner,
        file_name: &str,
        bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Evidence> {
        self.require_owner(owner)?;
        let stored_ref = self.files().add_file(file_name, bytes)?;
        self.persist_evidence(owner, file_name.to_owned(), stored_ref, now)
    }

    /// Attach a pasted image as evidence on a run entry.
    pub fn paste_evidence_image(
        &self,
        owner: EvidenceOwner,
        bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Evidence> {
        self.require_owner(owner)?;
        let (file_name, stored_ref) = self.files().paste_image(bytes)?;
        self.persist_evidence(owner, file_name, stored_ref, now)
    }

    /// Fetch a previewable form of an evidence file. Files above the
    /// configured ceiling come back as [`Preview::TooLarge`], a value rather
    /// than an error, so views render "too large" inline.
    pub fn evidence_preview(&self, id: EvidenceId) -> Result<Preview> {
        let row = self.store().get_evidence(id)?;
        self.files()
            .preview(&row.stored_ref, self.config().preview_max_bytes)
    }

    /// Explicitly delete one evidence row and its stored bytes.
    pub fn remove_evidence(&self, id: EvidenceId) -> Result<()> {
        let row = self.store().get_evidence(id)?;
        self.store().delete_evidence(id)?;
        self.files().remove(&row.stored_ref)?;
        debug!(evidence = %id, "evidence removed");
        Ok(())
    }

    /// Evidence rows attached to one run entry.
    pub fn evidence_for(&self, owner: EvidenceOwner) -> Result<Vec<Evidence>> {
        self.store().evidence_of(owner)
    }

    fn require_owner(&self, owner: EvidenceOwner) -> Result<()> {
        match owner {
            EvidenceOwner::ScenarioEntry(id) => self.store().get_run_scenario(id).map(|_| ()),
            EvidenceOwner::CaseEntry(id) => self.store().get_run_case(id).map(|_| ()),
        }
    }

    fn persist_evidence(
        &self,
        owner: EvidenceOwner,
        file_name: String,
        stored_ref: String,
        now: DateTime<Utc>,
    ) -> Result<Evidence> {
        let mut row = Evidence {
            id: EvidenceId::UNSET,
            owner,
            file_name,
            stored_ref,
            created_at: now,
        };
        row.id = self.store().save_evidence(row.clone())?;
        Ok(row)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
