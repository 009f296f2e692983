//! Append-only transaction ledger for Shelf.
//!
//! This crate owns the issue/return history. It provides:
//! - The [`Ledger`] itself, serialized as the `ledger.json` array
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - Replay of the history into per-book holders
//! - Projections (per-book and per-user history, summary counts)
//! - Stream validation (issue/return alternation per book)

pub mod error;
pub mod ledger;
pub mod projection;
pub mod replay;
pub mod traits;
pub mod validation;

pub use error::LedgerError;
pub use ledger::Ledger;
pub use projection::{LedgerEntry, LedgerSummary, ProjectionBuilder};
pub use replay::{ReplayEngine, ReplayResult};
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{StreamValidator, ValidationReport, Violation, ViolationKind};
