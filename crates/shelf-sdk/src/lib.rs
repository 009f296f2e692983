//! High-level API for Shelf.
//!
//! [`Library`] is the transaction engine: it owns the catalog, the
//! membership list and the ledger, and enforces the issue/return state
//! machine. [`Session`] binds a library to a [`StateStore`] and persists
//! each successful [`Command`]. Any front end (CLI, web handler, TUI) drives
//! the library through these types.

pub mod command;
pub mod config;
pub mod error;
pub mod library;
pub mod session;

pub use command::{Command, Outcome};
pub use config::{LibraryConfig, CONFIG_FILE_NAME};
pub use error::{LibraryError, LibraryResult};
pub use library::{Library, LibrarySummary};
pub use session::Session;

// Re-export key types
pub use shelf_ledger::{
    LedgerEntry, LedgerError, LedgerReader, LedgerSummary, ProjectionBuilder, ValidationReport, Violation,
    ViolationKind,
};
pub use shelf_store::{Catalog, Collection, JsonDirStore, JsonLayout, Membership, StateStore};
pub use shelf_types::{Action, Book, BookId, BookState, EntityKind, TransactionRecord, UserId};
