//! Flat-file JSON backend.
//!
//! Each collection lives in its own human-readable JSON document inside a
//! data directory:
//!
//! ```text
//! <dir>/books.json    {"B1": {"title": "Dune", "issued_to": null}}
//! <dir>/users.json    {"U1": "Ann"}
//! <dir>/ledger.json   [["B1", "Dune", "U1", "Ann", "Issued"]]
//! ```
//!
//! A missing file loads as an empty collection. Saves rewrite the whole
//! file in place.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shelf_ledger::{Ledger, LedgerReader};

use crate::catalog::Catalog;
use crate::error::{StoreError, StoreResult};
use crate::membership::Membership;
use crate::traits::StateStore;

/// File names and formatting for a [`JsonDirStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonLayout {
    pub books_file: String,
    pub users_file: String,
    pub ledger_file: String,
    /// Spaces per indentation level in written files.
    pub indent: usize,
}

impl Default for JsonLayout {
    fn default() -> Self {
        Self {
            books_file: "books.json".into(),
            users_file: "users.json".into(),
            ledger_file: "ledger.json".into(),
            indent: 4,
        }
    }
}

/// A [`StateStore`] backed by three JSON files in one directory.
#[derive(Clone, Debug)]
pub struct JsonDirStore {
    dir: PathBuf,
    layout: JsonLayout,
}

impl JsonDirStore {
    /// A store in `dir` using the default file names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_layout(dir, JsonLayout::default())
    }

    pub fn with_layout(dir: impl Into<PathBuf>, layout: JsonLayout) -> Self {
        Self {
            dir: dir.into(),
            layout,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn books_path(&self) -> PathBuf {
        self.dir.join(&self.layout.books_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.dir.join(&self.layout.users_file)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.join(&self.layout.ledger_file)
    }

    fn load_or_default<T>(&self, path: PathBuf) -> StoreResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "state file absent, starting empty");
                return Ok(T::default());
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&text).map_err(|e| StoreError::Malformed {
            reason: e.to_string(),
            path,
        })
    }

    fn write_json<T: Serialize>(&self, path: PathBuf, value: &T) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let indent = vec![b' '; self.layout.indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut serializer)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        fs::write(&path, &buf).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = buf.len(), "state file written");
        Ok(())
    }
}

impl StateStore for JsonDirStore {
    fn load_books(&self) -> StoreResult<Catalog> {
        let books: Catalog = self.load_or_default(self.books_path())?;
        debug!(count = books.len(), "books loaded");
        Ok(books)
    }

    fn load_users(&self) -> StoreResult<Membership> {
        let users: Membership = self.load_or_default(self.users_path())?;
        debug!(count = users.len(), "users loaded");
        Ok(users)
    }

    fn load_ledger(&self) -> StoreResult<Ledger> {
        let ledger: Ledger = self.load_or_default(self.ledger_path())?;
        debug!(count = ledger.len(), "ledger loaded");
        Ok(ledger)
    }

    fn save_books(&self, books: &Catalog) -> StoreResult<()> {
        self.write_json(self.books_path(), books)
    }

    fn save_users(&self, users: &Membership) -> StoreResult<()> {
        self.write_json(self.users_path(), users)
    }

    fn save_ledger(&self, ledger: &Ledger) -> StoreResult<()> {
        self.write_json(self.ledger_path(), ledger)
    }
}
