//! In-memory reference implementation of [`Store`].
//!
//! All tables live behind one `RwLock`, which is what makes every mutating
//! operation atomic with respect to every other: the single-user application
//! has exactly one writer, and a cascade runs to completion while the lock
//! is held. Ids are rowids from a single monotonically increasing counter;
//! id 0 is never assigned.

use std::sync::Arc;

use casetrack_error::{CaseTrackError, Result};
use casetrack_types::{
    CaseFolder, CaseId, DataSet, DataSetId, Evidence, EvidenceId, EvidenceOwner, FolderId,
    RunCaseEntry, RunCaseId, RunId, RunScenarioEntry, RunScenarioId, Scenario, ScenarioId,
    TestCase, TestRun,
};
use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::traits::Store;

#[derive(Debug, Default)]
struct Tables {
    cases: HashMap<CaseId, TestCase>,
    folders: HashMap<FolderId, CaseFolder>,
    scenarios: HashMap<ScenarioId, Scenario>,
    datasets: HashMap<DataSetId, DataSet>,
    runs: HashMap<RunId, TestRun>,
    run_scenarios: HashMap<RunScenarioId, RunScenarioEntry>,
    run_cases: HashMap<RunCaseId, RunCaseEntry>,
    evidence: HashMap<EvidenceId, Evidence>,
    next_id: i64,
}

impl Tables {
    fn fresh_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`Store`] backed by per-entity tables behind one lock.
///
/// Cloning shares the underlying tables, so the engine and the shell can
/// hold the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(entity: &str, id: i64) -> CaseTrackError {
    CaseTrackError::not_found(entity, id)
}

impl Store for MemoryStore {
    // --- test cases ---

    fn list_cases(&self) -> Result<Vec<TestCase>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables.cases.values().cloned().collect();
        rows.sort_by_key(|c| c.id);
        Ok(rows)
    }

    fn get_case(&self, id: CaseId) -> Result<TestCase> {
        self.inner
            .read()
            .cases
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("test case", id.raw()))
    }

    fn save_case(&self, mut case: TestCase) -> Result<CaseId> {
        let mut tables = self.inner.write();
        if case.id.is_set() {
            if !tables.cases.contains_key(&case.id) {
                return Err(missing("test case", case.id.raw()));
            }
        } else {
            case.id = CaseId::new(tables.fresh_id());
        }
        let id = case.id;
        debug!(case = %id, title = %case.title, "case saved");
        tables.cases.insert(id, case);
        Ok(id)
    }

    fn delete_case(&self, id: CaseId) -> Result<()> {
        let mut tables = self.inner.write();
        tables
            .cases
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("test case", id.raw()))
    }

    // --- folders ---

    fn list_folders(&self) -> Result<Vec<CaseFolder>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables.folders.values().cloned().collect();
        rows.sort_by_key(|f| f.id);
        Ok(rows)
    }

    fn get_folder(&self, id: FolderId) -> Result<CaseFolder> {
        self.inner
            .read()
            .folders
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("case folder", id.raw()))
    }

    fn save_folder(&self, mut folder: CaseFolder) -> Result<FolderId> {
        let mut tables = self.inner.write();
        if folder.id.is_set() {
            if !tables.folders.contains_key(&folder.id) {
                return Err(missing("case folder", folder.id.raw()));
            }
        } else {
            folder.id = FolderId::new(tables.fresh_id());
        }
        let id = folder.id;
        tables.folders.insert(id, folder);
        Ok(id)
    }

    fn delete_folder(&self, id: FolderId) -> Result<()> {
        let mut tables = self.inner.write();
        if !tables.folders.contains_key(&id) {
            return Err(missing("case folder", id.raw()));
        }
        // Membership is a reference on the case side; clear it, keep the cases.
        for case in tables.cases.values_mut() {
            if case.folder_id == Some(id) {
                case.folder_id = None;
            }
        }
        tables.folders.remove(&id);
        info!(folder = %id, "folder deleted, member cases unfiled");
        Ok(())
    }

    // --- scenarios ---

    fn list_scenarios(&self) -> Result<Vec<Scenario>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables.scenarios.values().cloned().collect();
        rows.sort_by_key(|s| s.id);
        Ok(rows)
    }

    fn get_scenario(&self, id: ScenarioId) -> Result<Scenario> {
        self.inner
            .read()
            .scenarios
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("scenario", id.raw()))
    }

    fn save_scenario(&self, mut scenario: Scenario) -> Result<ScenarioId> {
        let mut tables = self.inner.write();
        if scenario.id.is_set() {
            if !tables.scenarios.contains_key(&scenario.id) {
                return Err(missing("scenario", scenario.id.raw()));
            }
        } else {
            scenario.id = ScenarioId::new(tables.fresh_id());
        }
        let id = scenario.id;
        tables.scenarios.insert(id, scenario);
        Ok(id)
    }

    fn delete_scenario(&self, id: ScenarioId) -> Result<()> {
        let mut tables = self.inner.write();
        tables
            .scenarios
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("scenario", id.raw()))
    }

    // --- datasets ---

    fn list_datasets(&self) -> Result<Vec<DataSet>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables.datasets.values().cloned().collect();
        rows.sort_by_key(|d| d.id);
        Ok(rows)
    }

    fn get_dataset(&self, id: DataSetId) -> Result<DataSet> {
        self.inner
            .read()
            .datasets
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("data set", id.raw()))
    }

    fn save_dataset(&self, mut dataset: DataSet) -> Result<DataSetId> {
        let mut tables = self.inner.write();
        if dataset.id.is_set() {
            if !tables.datasets.contains_key(&dataset.id) {
                return Err(missing("data set", dataset.id.raw()));
            }
        } else {
            dataset.id = DataSetId::new(tables.fresh_id());
        }
        let id = dataset.id;
        tables.datasets.insert(id, dataset);
        Ok(id)
    }

    fn delete_dataset(&self, id: DataSetId) -> Result<()> {
        let mut tables = self.inner.write();
        tables
            .datasets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("data set", id.raw()))
    }

    // --- runs ---

    fn list_runs(&self) -> Result<Vec<TestRun>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables.runs.values().cloned().collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    fn get_run(&self, id: RunId) -> Result<TestRun> {
        self.inner
            .read()
            .runs
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("test run", id.raw()))
    }

    fn save_run(&self, mut run: TestRun) -> Result<RunId> {
        let mut tables = self.inner.write();
        if run.id.is_set() {
            if !tables.runs.contains_key(&run.id) {
                return Err(missing("test run", run.id.raw()));
            }
        } else {
            run.id = RunId::new(tables.fresh_id());
        }
        let id = run.id;
        debug!(run = %id, name = %run.name, "run saved");
        tables.runs.insert(id, run);
        Ok(id)
    }

    fn delete_run(&self, id: RunId) -> Result<()> {
        let mut tables = self.inner.write();
        if !tables.runs.contains_key(&id) {
            return Err(missing("test run", id.raw()));
        }
        let entry_ids: Vec<RunScenarioId> = tables
            .run_scenarios
            .values()
            .filter(|e| e.run_id == id)
            .map(|e| e.id)
            .collect();
        for entry_id in &entry_ids {
            cascade_run_scenario(&mut tables, *entry_id);
        }
        tables.runs.remove(&id);
        verify_no_orphans(&tables)?;
        info!(run = %id, entries = entry_ids.len(), "run deleted");
        Ok(())
    }

    // --- run scenario entries ---

    fn get_run_scenario(&self, id: RunScenarioId) -> Result<RunScenarioEntry> {
        self.inner
            .read()
            .run_scenarios
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("run scenario entry", id.raw()))
    }

    fn save_run_scenario(&self, mut entry: RunScenarioEntry) -> Result<RunScenarioId> {
        let mut tables = self.inner.write();
        if entry.id.is_set() {
            if !tables.run_scenarios.contains_key(&entry.id) {
                return Err(missing("run scenario entry", entry.id.raw()));
            }
        } else {
            entry.id = RunScenarioId::new(tables.fresh_id());
        }
        let id = entry.id;
        tables.run_scenarios.insert(id, entry);
        Ok(id)
    }

    fn delete_run_scenario(&self, id: RunScenarioId) -> Result<()> {
        let mut tables = self.inner.write();
        if !tables.run_scenarios.contains_key(&id) {
            return Err(missing("run scenario entry", id.raw()));
        }
        cascade_run_scenario(&mut tables, id);
        verify_no_orphans(&tables)?;
        info!(entry = %id, "run scenario entry deleted with cascade");
        Ok(())
    }

    // --- run case entries ---

    fn get_run_case(&self, id: RunCaseId) -> Result<RunCaseEntry> {
        self.inner
            .read()
            .run_cases
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("run case entry", id.raw()))
    }

    fn save_run_case(&self, mut entry: RunCaseEntry) -> Result<RunCaseId> {
        let mut tables = self.inner.write();
        if entry.id.is_set() {
            if !tables.run_cases.contains_key(&entry.id) {
                return Err(missing("run case entry", entry.id.raw()));
            }
        } else {
            entry.id = RunCaseId::new(tables.fresh_id());
        }
        let id = entry.id;
        tables.run_cases.insert(id, entry);
        Ok(id)
    }

    fn delete_run_case(&self, id: RunCaseId) -> Result<()> {
        let mut tables = self.inner.write();
        if !tables.run_cases.contains_key(&id) {
            return Err(missing("run case entry", id.raw()));
        }
        let owner = EvidenceOwner::CaseEntry(id);
        tables.evidence.retain(|_, ev| ev.owner != owner);
        tables.run_cases.remove(&id);
        Ok(())
    }

    // --- evidence rows ---

    fn get_evidence(&self, id: EvidenceId) -> Result<Evidence> {
        self.inner
            .read()
            .evidence
            .get(&id)
            .cloned()
            .ok_or_else(|| missing("evidence", id.raw()))
    }

    fn save_evidence(&self, mut evidence: Evidence) -> Result<EvidenceId> {
        let mut tables = self.inner.write();
        if evidence.id.is_set() {
            if !tables.evidence.contains_key(&evidence.id) {
                return Err(missing("evidence", evidence.id.raw()));
            }
        } else {
            evidence.id = EvidenceId::new(tables.fresh_id());
        }
        let id = evidence.id;
        tables.evidence.insert(id, evidence);
        Ok(id)
    }

    fn delete_evidence(&self, id: EvidenceId) -> Result<()> {
        let mut tables = self.inner.write();
        tables
            .evidence
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| missing("evidence", id.raw()))
    }

    // --- relationship queries ---

    fn cases_in_folder(&self, folder: FolderId) -> Result<Vec<TestCase>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables
            .cases
            .values()
            .filter(|c| c.folder_id == Some(folder))
            .cloned()
            .collect();
        // Display order.
        rows.sort_by_key(|c| (c.created_at, c.id));
        Ok(rows)
    }

    fn cases_of_scenario(&self, id: ScenarioId) -> Result<Vec<TestCase>> {
        let tables = self.inner.read();
        let scenario = tables
            .scenarios
            .get(&id)
            .ok_or_else(|| missing("scenario", id.raw()))?;
        scenario
            .cases
            .iter()
            .map(|sc| {
                tables
                    .cases
                    .get(&sc.case_id)
                    .cloned()
                    .ok_or_else(|| missing("test case", sc.case_id.raw()))
            })
            .collect()
    }

    fn run_scenario_entries_of_run(&self, run: RunId) -> Result<Vec<RunScenarioEntry>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables
            .run_scenarios
            .values()
            .filter(|e| e.run_id == run)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.id);
        Ok(rows)
    }

    fn run_case_entries_of_run_scenario(&self, id: RunScenarioId) -> Result<Vec<RunCaseEntry>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables
            .run_cases
            .values()
            .filter(|e| e.run_scenario_id == id)
            .cloned()
            .collect();
        // Case entries were inserted in scenario order; ids preserve it.
        rows.sort_by_key(|e| e.id);
        Ok(rows)
    }

    fn evidence_of(&self, owner: EvidenceOwner) -> Result<Vec<Evidence>> {
        let tables = self.inner.read();
        let mut rows: Vec<_> = tables
            .evidence
            .values()
            .filter(|ev| ev.owner == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|ev| ev.id);
        Ok(rows)
    }

    fn find_run_scenario(
        &self,
        run: RunId,
        scenario: ScenarioId,
    ) -> Result<Option<RunScenarioEntry>> {
        let tables = self.inner.read();
        Ok(tables
            .run_scenarios
            .values()
            .find(|e| e.run_id == run && e.scenario_id == scenario)
            .cloned())
    }
}

/// Remove one run scenario entry, its case entries, and all their evidence.
fn cascade_run_scenario(tables: &mut Tables, id: RunScenarioId) {
    let case_ids: Vec<RunCaseId> = tables
        .run_cases
        .values()
        .filter(|e| e.run_scenario_id == id)
        .map(|e| e.id)
        .collect();
    tables.evidence.retain(|_, ev| match ev.owner {
        EvidenceOwner::ScenarioEntry(owner) => owner != id,
        EvidenceOwner::CaseEntry(owner) => !case_ids.contains(&owner),
    });
    for case_id in case_ids {
        tables.run_cases.remove(&case_id);
    }
    tables.run_scenarios.remove(&id);
}

/// Post-cascade check: every surviving child row must still have a parent.
fn verify_no_orphans(tables: &Tables) -> Result<()> {
    for entry in tables.run_cases.values() {
        if !tables.run_scenarios.contains_key(&entry.run_scenario_id) {
            return Err(CaseTrackError::cascade(format!(
                "run case entry {} orphaned by incomplete cascade",
                entry.id
            )));
        }
    }
    for ev in tables.evidence.values() {
        let alive = match ev.owner {
            EvidenceOwner::ScenarioEntry(id) => tables.run_scenarios.contains_key(&id),
            EvidenceOwner::CaseEntry(id) => tables.run_cases.contains_key(&id),
        };
        if !alive {
            return Err(CaseTrackError::cascade(format!(
                "evidence {} orphaned by incomplete cascade",
                ev.id
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use casetrack_types::{EntryStatus, ScenarioCase};
    use chrono::{TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn entry_for(store: &MemoryStore, run: RunId, scenario: ScenarioId) -> RunScenarioId {
        store
            .save_run_scenario(RunScenarioEntry {
                id: RunScenarioId::UNSET,
                run_id: run,
                scenario_id: scenario,
                title: "smoke".to_owned(),
                status: EntryStatus::NotRun,
                assignee: String::new(),
                actual_result: String::new(),
                notes: String::new(),
                executed_at: None,
            })
            .unwrap()
    }

    #[test]
    fn test_save_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.save_case(TestCase::new("a", now())).unwrap();
        let b = store.save_case(TestCase::new("b", now())).unwrap();
        assert_ne!(a, b);
        assert!(a.is_set() && b.is_set());
    }

    #[test]
    fn test_save_with_unknown_id_fails() {
        let store = MemoryStore::new();
        let mut case = TestCase::new("ghost", now());
        case.id = CaseId::new(999);
        assert!(store.save_case(case).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_round_trip() {
        let store = MemoryStore::new();
        let id = store.save_case(TestCase::new("orig", now())).unwrap();
        let mut case = store.get_case(id).unwrap();
        case.title = "renamed".to_owned();
        store.save_case(case).unwrap();
        assert_eq!(store.get_case(id).unwrap().title, "renamed");
        assert_eq!(store.list_cases().unwrap().len(), 1);
    }

    // === Test: folder delete unfiles members, keeps cases ===
    #[test]
    fn test_delete_folder_unfiles_cases() {
        let store = MemoryStore::new();
        let folder = store.save_folder(CaseFolder::new("regression")).unwrap();
        let mut case = TestCase::new("member", now());
        case.folder_id = Some(folder);
        let case_id = store.save_case(case).unwrap();

        store.delete_folder(folder).unwrap();
        let case = store.get_case(case_id).unwrap();
        assert_eq!(case.folder_id, None);
        assert!(store.get_folder(folder).is_err());
    }

    // === Test: run scenario cascade removes case entries and evidence ===
    #[test]
    fn test_run_scenario_cascade() {
        let store = MemoryStore::new();
        let run = store.save_run(TestRun::new("r1")).unwrap();
        let entry = entry_for(&store, run, ScenarioId::new(50));
        let case_entry = store
            .save_run_case(RunCaseEntry {
                id: RunCaseId::UNSET,
                run_scenario_id: entry,
                case_id: CaseId::new(60),
                case_title: "c".to_owned(),
                preconditions: String::new(),
                tags: std::collections::BTreeSet::new(),
                status: EntryStatus::NotRun,
                actual_result: String::new(),
                notes: String::new(),
                executed_at: None,
            })
            .unwrap();
        for owner in [
            EvidenceOwner::ScenarioEntry(entry),
            EvidenceOwner::CaseEntry(case_entry),
        ] {
            store
                .save_evidence(Evidence {
                    id: EvidenceId::UNSET,
                    owner,
                    file_name: "shot.png".to_owned(),
                    stored_ref: "ref".to_owned(),
                    created_at: now(),
                })
                .unwrap();
        }

        store.delete_run_scenario(entry).unwrap();
        assert!(store.get_run_scenario(entry).is_err());
        assert!(store.get_run_case(case_entry).is_err());
        assert!(
            store
                .evidence_of(EvidenceOwner::ScenarioEntry(entry))
                .unwrap()
                .is_empty()
        );
        assert!(
            store
                .evidence_of(EvidenceOwner::CaseEntry(case_entry))
                .unwrap()
                .is_empty()
        );
        // The run itself survives.
        assert!(store.get_run(run).is_ok());
    }

    #[test]
    fn test_delete_run_cascades_all_entries() {
        let store = MemoryStore::new();
        let run = store.save_run(TestRun::new("r1")).unwrap();
        let e1 = entry_for(&store, run, ScenarioId::new(1));
        let e2 = entry_for(&store, run, ScenarioId::new(2));
        store.delete_run(run).unwrap();
        assert!(store.get_run_scenario(e1).is_err());
        assert!(store.get_run_scenario(e2).is_err());
    }

    #[test]
    fn test_find_run_scenario() {
        let store = MemoryStore::new();
        let run = store.save_run(TestRun::new("r1")).unwrap();
        let scenario = ScenarioId::new(7);
        assert!(store.find_run_scenario(run, scenario).unwrap().is_none());
        entry_for(&store, run, scenario);
        assert!(store.find_run_scenario(run, scenario).unwrap().is_some());
    }

    #[test]
    fn test_cases_in_folder_display_order() {
        let store = MemoryStore::new();
        let folder = store.save_folder(CaseFolder::new("f")).unwrap();
        let t0 = now();
        let t1 = t0 + chrono::Duration::minutes(5);
        for (title, at) in [("later", t1), ("earlier", t0)] {
            let mut case = TestCase::new(title, at);
            case.folder_id = Some(folder);
            store.save_case(case).unwrap();
        }
        let ordered = store.cases_in_folder(folder).unwrap();
        assert_eq!(ordered[0].title, "earlier");
        assert_eq!(ordered[1].title, "later");
    }

    #[test]
    fn test_cases_of_scenario_requires_live_cases() {
        let store = MemoryStore::new();
        let case = store.save_case(TestCase::new("c", now())).unwrap();
        let mut scenario = Scenario::new("s");
        scenario.cases.push(ScenarioCase {
            case_id: case,
            position: 0,
        });
        let sid = store.save_scenario(scenario).unwrap();
        assert_eq!(store.cases_of_scenario(sid).unwrap().len(), 1);

        store.delete_case(case).unwrap();
        assert!(store.cases_of_scenario(sid).unwrap_err().is_not_found());
    }
}
