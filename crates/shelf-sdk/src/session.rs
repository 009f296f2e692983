use tracing::{error, info, warn};

use shelf_store::StateStore;

use crate::command::{Command, Outcome};
use crate::error::LibraryResult;
use crate::library::Library;

/// A [`Library`] bound to the store it was loaded from.
///
/// Every successful command is written back before `execute` returns,
/// touching only the collections the command changed. A refused command
/// writes nothing. If the write fails the in-memory state is rolled back,
/// so a retry sees the library as it was before the command.
pub struct Session<S: StateStore> {
    library: Library,
    store: S,
}

impl<S: StateStore> Session<S> {
    /// Load all three collections from `store`. Missing state starts empty.
    pub fn open(store: S) -> LibraryResult<Self> {
        let library = Library::from_collections(store.load()?);
        Ok(Self { library, store })
    }

    /// Apply `command` and persist what it changed.
    pub fn execute(&mut self, command: Command) -> LibraryResult<Outcome> {
        let name = command.name();
        let snapshot = self.library.clone();
        let outcome = self.library.apply(command).map_err(|e| {
            warn!(command = name, error = %e, "command refused");
            e
        })?;
        if let Err(e) = self.store.save(self.library.collections(), outcome.touched()) {
            error!(command = name, error = %e, "save failed, rolling back");
            self.library = snapshot;
            return Err(e.into());
        }
        info!(command = name, "{outcome}");
        Ok(outcome)
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the store, keeping the in-memory state.
    pub fn into_library(self) -> Library {
        self.library
    }
}
