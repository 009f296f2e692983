use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use shelf_store::{JsonDirStore, JsonLayout};

use crate::error::{LibraryError, LibraryResult};

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "shelf.toml";

/// Where and how the library state is stored.
///
/// Every field is optional in the TOML file:
///
/// ```toml
/// data_dir = "/var/lib/shelf"
/// books_file = "books.json"
/// users_file = "users.json"
/// ledger_file = "ledger.json"
/// indent = 4
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory holding the three state files.
    pub data_dir: PathBuf,
    #[serde(flatten)]
    pub files: JsonLayout,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            files: JsonLayout::default(),
        }
    }
}

impl LibraryConfig {
    /// Parse a config document.
    pub fn from_toml(text: &str) -> LibraryResult<Self> {
        toml::from_str(text).map_err(|e| LibraryError::Config(e.to_string()))
    }

    /// Read `path`. The file must exist.
    pub fn load(path: &Path) -> LibraryResult<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| LibraryError::Config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "config loaded");
        Self::from_toml(&text)
    }

    /// Read `path` if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> LibraryResult<Self> {
        match path.try_exists() {
            Ok(false) => Ok(Self::default()),
            Ok(true) => Self::load(path),
            Err(e) => Err(LibraryError::Config(format!("{}: {e}", path.display()))),
        }
    }

    /// Replace the data directory, e.g. from a command-line flag.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// The JSON file store this config describes.
    pub fn open_store(&self) -> JsonDirStore {
        JsonDirStore::with_layout(&self.data_dir, self.files.clone())
    }
}
