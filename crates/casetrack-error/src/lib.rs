//! Error types for the CaseTrack engine.
//!
//! One structured enum for the whole workspace: referenced-entity lookups,
//! pre-write validation, cascade failures, and the collaborator seams
//! (persistence, evidence files). Validation always happens before any
//! write, so a `ValidationFailed` or `NotFound` guarantees the store was
//! left untouched by the failed operation.

use thiserror::Error;

/// Primary error type for CaseTrack operations.
#[derive(Error, Debug)]
pub enum CaseTrackError {
    /// A referenced case/scenario/run/entry does not exist.
    #[error("{entity} not found: id {id}")]
    NotFound {
        /// Entity kind label, e.g. `"test case"` or `"run scenario entry"`.
        entity: String,
        /// The id that failed to resolve.
        id: i64,
    },

    /// Input rejected before any mutation took place.
    #[error("validation failed: {detail}")]
    ValidationFailed { detail: String },

    /// A resource exceeds its configured size ceiling.
    #[error("resource too large: {size} bytes (limit {limit})")]
    ResourceTooLarge { size: u64, limit: u64 },

    /// A cascading delete could not finish; the operation was aborted with
    /// no partial state left visible.
    #[error("cascade incomplete: {detail}")]
    CascadeIncomplete { detail: String },

    /// The persistence collaborator failed internally.
    #[error("storage error: {detail}")]
    Storage { detail: String },

    /// File I/O error from the evidence file collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaseTrackError {
    /// Create a `NotFound` error for the given entity kind and id.
    pub fn not_found(entity: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Create a `ValidationFailed` error.
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::ValidationFailed {
            detail: detail.into(),
        }
    }

    /// Create a `CascadeIncomplete` error.
    pub fn cascade(detail: impl Into<String>) -> Self {
        Self::CascadeIncomplete {
            detail: detail.into(),
        }
    }

    /// Create a `Storage` error.
    pub fn storage(detail: impl Into<String>) -> Self {
        Self::Storage {
            detail: detail.into(),
        }
    }

    /// Whether this error names a missing referenced entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error was raised by pre-write validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Whether the user can likely fix this without code changes.
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::ValidationFailed { .. } | Self::ResourceTooLarge { .. }
        )
    }
}

/// Convenience result type used throughout the workspace.
pub type Result<T> = std::result::Result<T, CaseTrackError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
