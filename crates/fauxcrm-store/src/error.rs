//! Record store errors

use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record of that type with that id
    #[error("record {logical_name} {id} does not exist")]
    MissingRecord { logical_name: String, id: Uuid },

    /// Create with an id that is already taken
    #[error("record {logical_name} {id} already exists")]
    DuplicateRecord { logical_name: String, id: Uuid },

    /// Guarded write found a different stored version than the caller's
    /// token; the record was modified since the caller read it
    #[error(
        "concurrency conflict on {logical_name} {id}: expected version {expected}, stored version is {actual}"
    )]
    ConcurrencyConflict {
        logical_name: String,
        id: Uuid,
        expected: u64,
        actual: u64,
    },
}
