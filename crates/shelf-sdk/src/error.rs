use shelf_ledger::LedgerError;
use shelf_store::StoreError;
use shelf_types::{BookId, BookState, EntityKind, TypeError};
use thiserror::Error;

/// Every way a library operation can be refused.
///
/// The domain variants are user-facing warnings: the operation changed nothing
/// and wrote nothing. `Storage` and `Config` come from the environment.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{kind} id already exists: {id}")]
    DuplicateKey { kind: EntityKind, id: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("book {book} is already {state}")]
    InvalidState { book: BookId, state: BookState },

    #[error("missing input: {0}")]
    MissingInput(#[from] TypeError),

    #[error("{0}")]
    Ledger(#[from] LedgerError),

    #[error("storage error: {0}")]
    Storage(StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl LibraryError {
    /// `true` for refusals caused by the request itself rather than the
    /// environment.
    pub fn is_warning(&self) -> bool {
        !matches!(self, LibraryError::Storage(_) | LibraryError::Config(_))
    }
}

impl From<StoreError> for LibraryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { kind, id } => LibraryError::DuplicateKey { kind, id },
            StoreError::NotFound { kind, id } => LibraryError::NotFound { kind, id },
            other => LibraryError::Storage(other),
        }
    }
}

pub type LibraryResult<T> = Result<T, LibraryError>;
