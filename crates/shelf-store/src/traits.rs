//! The [`StateStore`] trait defining the persistence interface.
//!
//! Any backend (JSON files, memory) implements this trait to load and save
//! the three library collections.

use std::fmt;

use shelf_ledger::Ledger;

use crate::catalog::Catalog;
use crate::error::StoreResult;
use crate::membership::Membership;

/// Names one of the three persisted collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Books,
    Users,
    Ledger,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Books => f.write_str("books"),
            Collection::Users => f.write_str("users"),
            Collection::Ledger => f.write_str("ledger"),
        }
    }
}

/// All three collections, as loaded together at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collections {
    pub books: Catalog,
    pub users: Membership,
    pub ledger: Ledger,
}

/// Storage backend for the library state.
///
/// Each collection is loaded and saved independently and saves replace the
/// whole stored document. A collection that was never saved loads as empty.
pub trait StateStore {
    fn load_books(&self) -> StoreResult<Catalog>;

    fn load_users(&self) -> StoreResult<Membership>;

    fn load_ledger(&self) -> StoreResult<Ledger>;

    fn save_books(&self, books: &Catalog) -> StoreResult<()>;

    fn save_users(&self, users: &Membership) -> StoreResult<()>;

    fn save_ledger(&self, ledger: &Ledger) -> StoreResult<()>;

    /// Load all three collections.
    fn load(&self) -> StoreResult<Collections> {
        Ok(Collections {
            books: self.load_books()?,
            users: self.load_users()?,
            ledger: self.load_ledger()?,
        })
    }

    /// Save the named collections from `state`, in the order given.
    fn save(&self, state: &Collections, which: &[Collection]) -> StoreResult<()> {
        for collection in which {
            match collection {
                Collection::Books => self.save_books(&state.books)?,
                Collection::Users => self.save_users(&state.users)?,
                Collection::Ledger => self.save_ledger(&state.ledger)?,
            }
        }
        Ok(())
    }
}
