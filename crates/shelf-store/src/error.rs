use std::path::PathBuf;

use shelf_types::EntityKind;

/// Errors from collection updates and persistence.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An entry with this id already exists.
    #[error("{kind} id already exists: {id}")]
    DuplicateKey { kind: EntityKind, id: String },

    /// The referenced id is not in the collection.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Reading or writing a state file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A state file exists but does not hold the expected JSON document.
    #[error("malformed state file {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Serialization failure while preparing a write.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// An in-memory backend lock was poisoned by a panicking writer.
    #[error("state lock poisoned")]
    LockPoisoned,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
