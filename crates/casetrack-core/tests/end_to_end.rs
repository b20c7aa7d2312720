//! End-to-end flows through the public engine surface.

use casetrack_core::{CaseResultPatch, Engine, RunHandle, summarize};
use casetrack_store::{MemEvidenceFiles, MemoryStore, Store};
use casetrack_types::{CaseFolder, EntryStatus, Scenario, TestCase, TestRun};
use chrono::{DateTime, TimeZone, Utc};

fn engine() -> Engine<MemoryStore, MemEvidenceFiles> {
    Engine::new(MemoryStore::new(), MemEvidenceFiles::new())
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 6, 10, 0, 0).unwrap()
}

// Create case C1, scenario SC1 containing it, run R1; attach; pass the case
// entry; the run rollup reads {1, 1, 0}.
#[test]
fn test_author_attach_execute_summarize() {
    let engine = engine();
    let t = now();

    let c1 = engine.save_case(TestCase::new("Login succeeds", t), t).unwrap();
    let mut sc1 = Scenario::new("Auth smoke");
    sc1.push_case(c1).unwrap();
    let sc1 = engine.save_scenario(sc1).unwrap();

    let r1 = engine.save_run(TestRun::new("R1")).unwrap();
    let entry = engine
        .attach_scenario(RunHandle::Existing(r1), sc1, None)
        .unwrap();

    let entries = engine.store().run_scenario_entries_of_run(r1).unwrap();
    assert_eq!(entries.len(), 1);
    let case_entries = engine.store().run_case_entries_of_run_scenario(entry).unwrap();
    assert_eq!(case_entries.len(), 1);
    assert_eq!(case_entries[0].case_title, "Login succeeds");
    assert_eq!(case_entries[0].status, EntryStatus::NotRun);

    let executed_at = t + chrono::Duration::minutes(30);
    engine
        .mark_case_executed(case_entries[0].id, EntryStatus::Pass, executed_at)
        .unwrap();

    let summary = engine.run_summary(r1).unwrap();
    assert_eq!((summary.total, summary.completed, summary.remaining), (1, 1, 0));
    assert_eq!(engine.run_progress_percent(r1).unwrap(), 100);

    let stored = engine.store().run_case_entries_of_run_scenario(entry).unwrap();
    assert_eq!(stored[0].executed_at, Some(executed_at));
}

// Folder [A, B, C] in display order becomes a scenario with positions
// [0, 1, 2] and the folder's name as title.
#[test]
fn test_folder_to_scenario_generation() {
    let engine = engine();
    let folder = engine.save_folder(CaseFolder::new("Payments")).unwrap();

    let mut expected = Vec::new();
    for (i, title) in ["A", "B", "C"].iter().enumerate() {
        let at = now() + chrono::Duration::minutes(i as i64);
        let mut case = TestCase::new(*title, at);
        case.folder_id = Some(folder);
        expected.push(engine.save_case(case, at).unwrap());
    }

    let scenario_id = engine.scenario_from_folder(folder, None).unwrap();
    let scenario = engine.store().get_scenario(scenario_id).unwrap();
    assert_eq!(scenario.title, "Payments");
    assert_eq!(scenario.case_ids(), expected);
    let positions: Vec<u32> = scenario.cases.iter().map(|sc| sc.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);

    // The generated scenario attaches like any authored one.
    let entry = engine
        .attach_scenario(RunHandle::Draft(TestRun::new("gen run")), scenario_id, None)
        .unwrap();
    let titles: Vec<String> = engine
        .store()
        .run_case_entries_of_run_scenario(entry)
        .unwrap()
        .into_iter()
        .map(|e| e.case_title)
        .collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

// Mixed statuses across two scenario entries roll up per entry and per run
// without ever being stored.
#[test]
fn test_multi_scenario_rollup() {
    let engine = engine();
    let t = now();

    let mut scenario_ids = Vec::new();
    for (scenario_title, case_titles) in
        [("auth", vec!["a1", "a2"]), ("billing", vec!["b1", "b2", "b3"])]
    {
        let mut scenario = Scenario::new(scenario_title);
        for title in case_titles {
            let id = engine.save_case(TestCase::new(title, t), t).unwrap();
            scenario.push_case(id).unwrap();
        }
        scenario_ids.push(engine.save_scenario(scenario).unwrap());
    }

    let run = engine.save_run(TestRun::new("weekly")).unwrap();
    let mut entries = Vec::new();
    for id in &scenario_ids {
        entries.push(engine.attach_scenario(RunHandle::Existing(run), *id, None).unwrap());
    }

    // auth: both pass. billing: one fail, one skip, one untouched.
    let auth_cases = engine.store().run_case_entries_of_run_scenario(entries[0]).unwrap();
    for entry in &auth_cases {
        engine.mark_case_executed(entry.id, EntryStatus::Pass, t).unwrap();
    }
    let billing_cases = engine.store().run_case_entries_of_run_scenario(entries[1]).unwrap();
    engine.mark_case_executed(billing_cases[0].id, EntryStatus::Fail, t).unwrap();
    engine
        .update_case_result(
            billing_cases[1].id,
            CaseResultPatch {
                status: Some(EntryStatus::Skip),
                ..CaseResultPatch::default()
            },
        )
        .unwrap();

    let auth = engine.scenario_entry_summary(entries[0]).unwrap();
    assert_eq!((auth.total, auth.completed, auth.remaining), (2, 2, 0));
    let billing = engine.scenario_entry_summary(entries[1]).unwrap();
    assert_eq!((billing.total, billing.completed, billing.remaining), (3, 1, 2));

    let run_summary = engine.run_summary(run).unwrap();
    assert_eq!(
        (run_summary.total, run_summary.completed, run_summary.remaining),
        (5, 3, 2)
    );
    assert_eq!(engine.run_progress_percent(run).unwrap(), 60);

    // The same numbers fall out of the pure function over the same statuses.
    let statuses: Vec<EntryStatus> = engine
        .store()
        .run_case_entries_of_run_scenario(entries[0])
        .unwrap()
        .into_iter()
        .chain(
            engine
                .store()
                .run_case_entries_of_run_scenario(entries[1])
                .unwrap(),
        )
        .map(|e| e.status)
        .collect();
    assert_eq!(summarize(statuses), run_summary);
}
