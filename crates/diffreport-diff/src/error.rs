//! Error types for the diff crate.

use diffreport_types::{Kind, TypeError};

use crate::record::Path;

/// Errors that can occur during diff operations.
///
/// `UnsupportedKind` and `RootNotObject` are fatal: the walk stops at the
/// first one and whatever the context accumulated so far is incomplete.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A value of a kind the differ does not handle (e.g. an array).
    #[error("unsupported value kind `{kind}` for property `{key}` at {at}")]
    UnsupportedKind { at: Path, key: String, kind: Kind },

    /// Both roots are present but at least one is not an object.
    #[error("comparison root {category}/{key} must be two objects, got {past} and {current}")]
    RootNotObject {
        category: String,
        key: String,
        past: Kind,
        current: Kind,
    },

    /// A snapshot could not be normalized into the value model.
    #[error(transparent)]
    Normalization(#[from] TypeError),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DiffError {
    /// Returns `true` if the walk was stopped mid-traversal.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DiffError::UnsupportedKind { .. } | DiffError::RootNotObject { .. }
        )
    }
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
