//! In-memory state store for testing and ephemeral use.
//!
//! [`InMemoryStateStore`] keeps the last saved copy of each collection
//! behind a `RwLock`, and remembers which collections were written so
//! tests can assert on persistence side effects.

use std::sync::RwLock;

use shelf_ledger::Ledger;

use crate::catalog::Catalog;
use crate::error::{StoreError, StoreResult};
use crate::membership::Membership;
use crate::traits::{Collection, Collections, StateStore};

/// An in-memory implementation of [`StateStore`]. Data is lost when the
/// store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    state: RwLock<Collections>,
    writes: RwLock<Vec<Collection>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved collections.
    pub fn with_state(state: Collections) -> Self {
        Self {
            state: RwLock::new(state),
            writes: RwLock::new(Vec::new()),
        }
    }

    /// Every save performed so far, oldest first.
    pub fn writes(&self) -> StoreResult<Vec<Collection>> {
        let writes = self.writes.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(writes.to_vec())
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> StoreResult<T> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&state))
    }

    fn write(&self, collection: Collection, f: impl FnOnce(&mut Collections)) -> StoreResult<()> {
        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut state);
        self.writes
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(collection);
        Ok(())
    }
}

impl StateStore for InMemoryStateStore {
    fn load_books(&self) -> StoreResult<Catalog> {
        self.read(|s| s.books.clone())
    }

    fn load_users(&self) -> StoreResult<Membership> {
        self.read(|s| s.users.clone())
    }

    fn load_ledger(&self) -> StoreResult<Ledger> {
        self.read(|s| s.ledger.clone())
    }

    fn save_books(&self, books: &Catalog) -> StoreResult<()> {
        self.write(Collection::Books, |s| s.books = books.clone())
    }

    fn save_users(&self, users: &Membership) -> StoreResult<()> {
        self.write(Collection::Users, |s| s.users = users.clone())
    }

    fn save_ledger(&self, ledger: &Ledger) -> StoreResult<()> {
        self.write(Collection::Ledger, |s| s.ledger = ledger.clone())
    }
}
