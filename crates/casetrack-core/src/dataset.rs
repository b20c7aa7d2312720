//! Dataset scoping: link validation, scope changes, candidate selection.
//!
//! A dataset's scope and its links co-vary: every link targets an entity of
//! the scope's kind, a common dataset carries no links at all, and changing
//! scope clears the link set, since a link under the old scope is
//! meaningless under the new one.

use casetrack_error::{CaseTrackError, Result};
use casetrack_store::{EvidenceFiles, Store};
use casetrack_types::{DataLink, DataScope, DataSet, DataSetId, EntityKind};
use tracing::debug;

use crate::Engine;

/// Check a link list against a scope: kind match, target existence, no
/// duplicate targets. Common scope admits only the empty list.
pub(crate) fn validate_links<S: Store + ?Sized>(
    store: &S,
    scope: DataScope,
    links: &[DataLink],
) -> Result<()> {
    if scope == DataScope::Common {
        if links.is_empty() {
            return Ok(());
        }
        return Err(CaseTrackError::validation(
            "a common-scoped dataset cannot carry links",
        ));
    }
    for (i, link) in links.iter().enumerate() {
        if !scope.permits(link.entity_type) {
            return Err(CaseTrackError::validation(format!(
                "link entity type {} does not match dataset scope {}",
                link.entity_type, scope
            )));
        }
        if links[..i]
            .iter()
            .any(|earlier| earlier.entity_id == link.entity_id)
        {
            return Err(CaseTrackError::validation(format!(
                "duplicate link target {} {}",
                link.entity_type, link.entity_id
            )));
        }
        match link.entity_type {
            EntityKind::Case => {
                store.get_case(link.entity_id.into())?;
            }
            EntityKind::Scenario => {
                store.get_scenario(link.entity_id.into())?;
            }
            EntityKind::Run => {
                store.get_run(link.entity_id.into())?;
            }
            EntityKind::Folder | EntityKind::DataSet => {
                return Err(CaseTrackError::validation(format!(
                    "links cannot target {}",
                    link.entity_type
                )));
            }
        }
    }
    Ok(())
}

impl<S: Store, F: EvidenceFiles> Engine<S, F> {
    /// Replace a dataset's full link set.
    ///
    /// The whole list is validated first; on any mismatch nothing changes.
    pub fn set_links(&self, dataset_id: DataSetId, links: Vec<DataLink>) -> Result<()> {
        let mut dataset = self.store().get_dataset(dataset_id)?;
        validate_links(self.store(), dataset.scope, &links)?;
        debug!(dataset = %dataset_id, links = links.len(), "link set replaced");
        dataset.links = links;
        self.store().save_dataset(dataset)?;
        Ok(())
    }

    /// Change a dataset's scope. Existing links are cleared.
    pub fn change_scope(&self, dataset_id: DataSetId, scope: DataScope) -> Result<()> {
        let mut dataset = self.store().get_dataset(dataset_id)?;
        if dataset.scope == scope {
            return Ok(());
        }
        dataset.scope = scope;
        dataset.links.clear();
        self.store().save_dataset(dataset)?;
        Ok(())
    }

    /// Datasets offerable for association with an entity of `kind`: every
    /// common dataset plus every dataset whose scope matches the kind.
    /// Run- and scenario-scoped data is never offered to member cases.
    pub fn dataset_candidates_for(&self, kind: EntityKind) -> Result<Vec<DataSet>> {
        Ok(self
            .store()
            .list_datasets()?
            .into_iter()
            .filter(|ds| ds.scope == DataScope::Common || ds.scope.permits(kind))
            .collect())
    }

    /// Datasets associated with one concrete entity: every common dataset
    /// plus those explicitly linked to it.
    pub fn datasets_linked_to(&self, kind: EntityKind, entity_id: i64) -> Result<Vec<DataSet>> {
        Ok(self
            .store()
            .list_datasets()?
            .into_iter()
            .filter(|ds| ds.scope == DataScope::Common || ds.links_to(kind, entity_id))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use casetrack_store::{MemEvidenceFiles, MemoryStore, Store};
    use casetrack_types::{DataLink, DataScope, DataSet, EntityKind, TestCase, TestRun};
    use chrono::{TimeZone, Utc};

    use crate::Engine;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 8, 0, 0).unwrap()
    }

    fn engine() -> Engine<MemoryStore, MemEvidenceFiles> {
        Engine::new(MemoryStore::new(), MemEvidenceFiles::new())
    }

    fn link(kind: EntityKind, id: i64) -> DataLink {
        DataLink {
            entity_type: kind,
            entity_id: id,
        }
    }

    // === Test: entity type must equal the dataset's scope ===
    #[test]
    fn test_set_links_rejects_mismatched_kind() {
        let engine = engine();
        let case = engine.save_case(TestCase::new("c", now()), now()).unwrap();
        let run = engine.save_run(TestRun::new("r")).unwrap();
        let ds = engine
            .save_dataset(DataSet::new("accounts", DataScope::Case))
            .unwrap();

        let err = engine
            .set_links(ds, vec![link(EntityKind::Run, run.raw())])
            .unwrap_err();
        assert!(err.is_validation());
        // Atomic: a mixed list leaves the stored set untouched.
        let err = engine
            .set_links(
                ds,
                vec![
                    link(EntityKind::Case, case.raw()),
                    link(EntityKind::Run, run.raw()),
                ],
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert!(engine.store().get_dataset(ds).unwrap().links.is_empty());

        engine
            .set_links(ds, vec![link(EntityKind::Case, case.raw())])
            .unwrap();
        assert_eq!(engine.store().get_dataset(ds).unwrap().links.len(), 1);
    }

    #[test]
    fn test_set_links_requires_live_target() {
        let engine = engine();
        let ds = engine
            .save_dataset(DataSet::new("ds", DataScope::Scenario))
            .unwrap();
        let err = engine
            .set_links(ds, vec![link(EntityKind::Scenario, 404)])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_common_scope_admits_no_links() {
        let engine = engine();
        let case = engine.save_case(TestCase::new("c", now()), now()).unwrap();
        let ds = engine
            .save_dataset(DataSet::new("globals", DataScope::Common))
            .unwrap();
        assert!(
            engine
                .set_links(ds, vec![link(EntityKind::Case, case.raw())])
                .unwrap_err()
                .is_validation()
        );
        engine.set_links(ds, Vec::new()).unwrap();
    }

    // === Test: changing scope clears links ===
    #[test]
    fn test_change_scope_clears_links() {
        let engine = engine();
        let case = engine.save_case(TestCase::new("c", now()), now()).unwrap();
        let ds = engine
            .save_dataset(DataSet::new("ds", DataScope::Case))
            .unwrap();
        engine
            .set_links(ds, vec![link(EntityKind::Case, case.raw())])
            .unwrap();

        engine.change_scope(ds, DataScope::Run).unwrap();
        let dataset = engine.store().get_dataset(ds).unwrap();
        assert_eq!(dataset.scope, DataScope::Run);
        assert!(dataset.links.is_empty());

        // Same scope again is a no-op.
        engine.change_scope(ds, DataScope::Run).unwrap();
    }

    #[test]
    fn test_candidates_by_kind() {
        let engine = engine();
        engine
            .save_dataset(DataSet::new("globals", DataScope::Common))
            .unwrap();
        engine
            .save_dataset(DataSet::new("per-case", DataScope::Case))
            .unwrap();
        engine
            .save_dataset(DataSet::new("per-run", DataScope::Run))
            .unwrap();

        let names: Vec<String> = engine
            .dataset_candidates_for(EntityKind::Case)
            .unwrap()
            .into_iter()
            .map(|ds| ds.name)
            .collect();
        assert_eq!(names, vec!["globals", "per-case"]);
    }

    // === Test: no inheritance from run/scenario scope to cases ===
    #[test]
    fn test_linked_to_is_explicit_only() {
        let engine = engine();
        let case = engine.save_case(TestCase::new("c", now()), now()).unwrap();
        engine
            .save_dataset(DataSet::new("globals", DataScope::Common))
            .unwrap();
        let per_case = engine
            .save_dataset(DataSet::new("per-case", DataScope::Case))
            .unwrap();

        // Nothing linked yet: only the common dataset applies.
        let names: Vec<String> = engine
            .datasets_linked_to(EntityKind::Case, case.raw())
            .unwrap()
            .into_iter()
            .map(|ds| ds.name)
            .collect();
        assert_eq!(names, vec!["globals"]);

        engine
            .set_links(per_case, vec![link(EntityKind::Case, case.raw())])
            .unwrap();
        let names: Vec<String> = engine
            .datasets_linked_to(EntityKind::Case, case.raw())
            .unwrap()
            .into_iter()
            .map(|ds| ds.name)
            .collect();
        assert_eq!(names, vec!["globals", "per-case"]);
    }

    #[test]
    fn test_duplicate_link_targets_rejected() {
        let engine = engine();
        let case = engine.save_case(TestCase::new("c", now()), now()).unwrap();
        let ds = engine
            .save_dataset(DataSet::new("ds", DataScope::Case))
            .unwrap();
        let err = engine
            .set_links(
                ds,
                vec![
                    link(EntityKind::Case, case.raw()),
                    link(EntityKind::Case, case.raw()),
                ],
            )
            .unwrap_err();
        assert!(err.is_validation());
    }
}
