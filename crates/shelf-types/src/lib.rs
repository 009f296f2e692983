//! Foundation types for Shelf, a library book issuing ledger.
//!
//! This crate provides the identifiers and records shared by every other
//! Shelf crate. It has no I/O and no behaviour beyond input normalisation.
//!
//! # Key Types
//!
//! - [`BookId`] / [`UserId`] — Non-empty string identifiers, kept verbatim
//! - [`Book`] — Catalog entry: title plus the current holder, if any
//! - [`BookState`] — `Available` or `Issued { to }`
//! - [`Action`] — The two ledger actions, `Issued` and `Returned`
//! - [`TransactionRecord`] — One immutable ledger row
//! - [`EntityKind`] — Names the collection an identifier belongs to

pub mod action;
pub mod book;
pub mod error;
pub mod ids;
pub mod record;

pub use action::Action;
pub use book::{Book, BookState};
pub use error::TypeError;
pub use ids::{non_blank, BookId, EntityKind, UserId};
pub use record::TransactionRecord;
