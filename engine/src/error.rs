//! Error types for the Larder engine.

use crate::{CollectionKind, RecordId};
use thiserror::Error;

/// All possible errors from the Larder engine.
///
/// Reconciliation itself never produces one of these: malformed records are
/// dropped during merge. Errors only come from single-record operations and
/// from decoding persisted state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Operation errors
    #[error("record not found in {kind}: {id}")]
    RecordNotFound { kind: CollectionKind, id: RecordId },

    #[error("record already exists in {kind}: {id}")]
    RecordAlreadyExists { kind: CollectionKind, id: RecordId },

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    // State errors
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::RecordNotFound {
            kind: CollectionKind::Recipes,
            id: "r1".into(),
        };
        assert_eq!(err.to_string(), "record not found in recipes: r1");

        let err = Error::RecordAlreadyExists {
            kind: CollectionKind::Groceries,
            id: "g1".into(),
        };
        assert_eq!(err.to_string(), "record already exists in groceries: g1");

        let err = Error::InvalidRecord("missing id".into());
        assert_eq!(err.to_string(), "invalid record: missing id");
    }
}
