//! Store-assigned id newtypes.
//!
//! Ids are `i64` rowids handed out by the persistence collaborator. Zero is
//! the unset sentinel carried by records that have not been saved yet; the
//! store never assigns it.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Sentinel for a record awaiting its first save.
            pub const UNSET: Self = Self(0);

            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn raw(self) -> i64 {
                self.0
            }

            /// Whether this id has been assigned by the store.
            #[must_use]
            pub const fn is_set(self) -> bool {
                self.0 != 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

define_id!(
    /// Id of an authored [`crate::TestCase`].
    CaseId
);
define_id!(
    /// Id of a [`crate::CaseFolder`].
    FolderId
);
define_id!(
    /// Id of an authored [`crate::Scenario`].
    ScenarioId
);
define_id!(
    /// Id of a [`crate::DataSet`].
    DataSetId
);
define_id!(
    /// Id of a [`crate::TestRun`].
    RunId
);
define_id!(
    /// Id of a [`crate::RunScenarioEntry`].
    RunScenarioId
);
define_id!(
    /// Id of a [`crate::RunCaseEntry`].
    RunCaseId
);
define_id!(
    /// Id of an [`crate::Evidence`] row.
    EvidenceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_sentinel() {
        assert!(!CaseId::UNSET.is_set());
        assert!(CaseId::new(1).is_set());
        assert_eq!(RunId::default(), RunId::UNSET);
    }

    #[test]
    fn test_serde_transparent() {
        let id = ScenarioId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: ScenarioId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
