//! Collections and persistence for Shelf.
//!
//! This crate holds the two keyed collections of the library and the
//! adapter that moves all three collections to and from disk.
//!
//! # Modules
//!
//! - [`catalog`] — [`Catalog`]: book id → title and current holder
//! - [`membership`] — [`Membership`]: user id → display name
//! - [`traits`] — The [`StateStore`] persistence interface
//! - [`json`] — [`JsonDirStore`], three JSON files in a data directory
//! - [`memory`] — [`InMemoryStateStore`] for tests and embedding

pub mod catalog;
pub mod error;
pub mod json;
pub mod membership;
pub mod memory;
pub mod traits;

pub use catalog::Catalog;
pub use error::{StoreError, StoreResult};
pub use json::{JsonDirStore, JsonLayout};
pub use membership::Membership;
pub use memory::InMemoryStateStore;
pub use traits::{Collection, Collections, StateStore};
