//! The persistence and file-content contracts.

use casetrack_error::Result;
use casetrack_types::{
    CaseFolder, CaseId, DataSet, DataSetId, Evidence, EvidenceId, EvidenceOwner, FolderId,
    RunCaseEntry, RunCaseId, RunId, RunScenarioEntry, RunScenarioId, Scenario, ScenarioId,
    TestCase, TestRun,
};

/// The persistence collaborator.
///
/// Per entity kind: `list` / `get` / `save` / `delete`, plus the
/// relationship queries the engines join on. Contract:
///
/// - `save` is atomic per record. A record with an unset id is inserted and
///   assigned a fresh id (returned); a record with a set id replaces the
///   stored row of that id, or fails `NotFound` if there is none.
/// - `delete` cascades: a run takes its scenario entries with it, a scenario
///   entry its case entries and evidence, a case entry its evidence. Folder
///   deletion un-sets `folder_id` on member cases without deleting them.
///   A cascade that cannot finish fails `CascadeIncomplete` and leaves no
///   partial state visible.
/// - `list` returns rows ordered by id; `cases_in_folder` returns display
///   order (`created_at`, then id).
///
/// Implementations serve a single-user application: mutating calls never
/// interleave.
pub trait Store: Send + Sync {
    // --- test cases ---
    fn list_cases(&self) -> Result<Vec<TestCase>>;
    fn get_case(&self, id: CaseId) -> Result<TestCase>;
    fn save_case(&self, case: TestCase) -> Result<CaseId>;
    fn delete_case(&self, id: CaseId) -> Result<()>;

    // --- folders ---
    fn list_folders(&self) -> Result<Vec<CaseFolder>>;
    fn get_folder(&self, id: FolderId) -> Result<CaseFolder>;
    fn save_folder(&self, folder: CaseFolder) -> Result<FolderId>;
    /// Un-sets `folder_id` on member cases, then removes the folder.
    fn delete_folder(&self, id: FolderId) -> Result<()>;

    // --- scenarios ---
    fn list_scenarios(&self) -> Result<Vec<Scenario>>;
    fn get_scenario(&self, id: ScenarioId) -> Result<Scenario>;
    fn save_scenario(&self, scenario: Scenario) -> Result<ScenarioId>;
    fn delete_scenario(&self, id: ScenarioId) -> Result<()>;

    // --- datasets ---
    fn list_datasets(&self) -> Result<Vec<DataSet>>;
    fn get_dataset(&self, id: DataSetId) -> Result<DataSet>;
    fn save_dataset(&self, dataset: DataSet) -> Result<DataSetId>;
    fn delete_dataset(&self, id: DataSetId) -> Result<()>;

    // --- runs ---
    fn list_runs(&self) -> Result<Vec<TestRun>>;
    fn get_run(&self, id: RunId) -> Result<TestRun>;
    fn save_run(&self, run: TestRun) -> Result<RunId>;
    fn delete_run(&self, id: RunId) -> Result<()>;

    // --- run scenario entries ---
    fn get_run_scenario(&self, id: RunScenarioId) -> Result<RunScenarioEntry>;
    fn save_run_scenario(&self, entry: RunScenarioEntry) -> Result<RunScenarioId>;
    fn delete_run_scenario(&self, id: RunScenarioId) -> Result<()>;

    // --- run case entries ---
    fn get_run_case(&self, id: RunCaseId) -> Result<RunCaseEntry>;
    fn save_run_case(&self, entry: RunCaseEntry) -> Result<RunCaseId>;
    fn delete_run_case(&self, id: RunCaseId) -> Result<()>;

    // --- evidence rows ---
    fn get_evidence(&self, id: EvidenceId) -> Result<Evidence>;
    fn save_evidence(&self, evidence: Evidence) -> Result<EvidenceId>;
    fn delete_evidence(&self, id: EvidenceId) -> Result<()>;

    // --- relationship queries ---
    /// Cases filed under `folder`, in display order.
    fn cases_in_folder(&self, folder: FolderId) -> Result<Vec<TestCase>>;
    /// The scenario's cases resolved to current records, in scenario order.
    ///
    /// Fails `NotFound` if any referenced case no longer exists.
    fn cases_of_scenario(&self, id: ScenarioId) -> Result<Vec<TestCase>>;
    fn run_scenario_entries_of_run(&self, run: RunId) -> Result<Vec<RunScenarioEntry>>;
    fn run_case_entries_of_run_scenario(&self, id: RunScenarioId) -> Result<Vec<RunCaseEntry>>;
    fn evidence_of(&self, owner: EvidenceOwner) -> Result<Vec<Evidence>>;
    /// The run's entry for `scenario`, if the scenario is attached.
    fn find_run_scenario(
        &self,
        run: RunId,
        scenario: ScenarioId,
    ) -> Result<Option<RunScenarioEntry>>;
}

/// Result of an evidence preview fetch.
///
/// Oversize is a distinguishable value, not an error: dashboards and detail
/// panes render "too large" inline and move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Decoded file content.
    Content { bytes: Vec<u8>, mime_type: String },
    /// The file exceeds the preview ceiling; the payload was not read.
    TooLarge { size: u64, limit: u64 },
}

/// The file-content collaborator for evidence bytes.
///
/// Stores opaque blobs addressed by a `stored_ref` string; the engine keeps
/// the owning [`Evidence`] row. Preview fetches are bounded reads: the size
/// check happens before any bytes are loaded.
pub trait EvidenceFiles: Send + Sync {
    /// Store the bytes of a picked file; returns the stored reference.
    fn add_file(&self, file_name: &str, bytes: &[u8]) -> Result<String>;

    /// Store a pasted image; returns `(generated_file_name, stored_ref)`.
    fn paste_image(&self, bytes: &[u8]) -> Result<(String, String)>;

    /// Fetch a previewable form of the stored file, honoring `limit` bytes.
    fn preview(&self, stored_ref: &str, limit: u64) -> Result<Preview>;

    /// Remove the stored bytes. Removing an already-absent ref is a no-op.
    fn remove(&self, stored_ref: &str) -> Result<()>;
}

/// Best-effort MIME type from a file name extension.
#[must_use]
pub fn mime_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for("shot.PNG"), "image/png");
        assert_eq!(mime_type_for("trace.log"), "text/plain");
        assert_eq!(mime_type_for("noext"), "application/octet-stream");
    }
}
