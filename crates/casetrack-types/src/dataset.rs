//! Initial-data sets and their scope-based links.

use serde::{Deserialize, Serialize};

use crate::id::DataSetId;
use crate::status::{DataScope, EntityKind};

/// One labeled value in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataItem {
    pub label: String,
    pub value: String,
    pub note: Option<String>,
}

/// Binds a non-common dataset to one entity of the matching kind.
///
/// The target id is a raw rowid because the kind varies per link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataLink {
    pub entity_type: EntityKind,
    pub entity_id: i64,
}

/// A named set of initial data offered to cases, scenarios, or runs.
///
/// Links are owned by the dataset record and always replaced as a unit, so
/// scope and links cannot drift apart. A `common` dataset has no links and
/// applies universally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSet {
    pub id: DataSetId,
    pub name: String,
    pub scope: DataScope,
    pub description: String,
    /// Ordered items.
    pub items: Vec<DataItem>,
    pub links: Vec<DataLink>,
}

impl DataSet {
    #[must_use]
    pub fn new(name: impl Into<String>, scope: DataScope) -> Self {
        Self {
            id: DataSetId::UNSET,
            name: name.into(),
            scope,
            description: String::new(),
            items: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Whether this dataset is linked to the given entity.
    #[must_use]
    pub fn links_to(&self, kind: EntityKind, entity_id: i64) -> bool {
        self.links
            .iter()
            .any(|l| l.entity_type == kind && l.entity_id == entity_id)
    }
}
