use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Per-book issue state. The only transitions are
/// `Available -> Issued` (issue) and `Issued -> Available` (return).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookState {
    Available,
    Issued { to: UserId },
}

impl fmt::Display for BookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookState::Available => f.write_str("available"),
            BookState::Issued { to } => write!(f, "issued to {to}"),
        }
    }
}

/// A catalog entry.
///
/// The id lives in the catalog key, not here. On disk a book is
/// `{"title": ..., "issued_to": ...}` with `issued_to` null while the book
/// is on the shelf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub issued_to: Option<UserId>,
}

impl Book {
    /// A freshly catalogued book, held by nobody.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            issued_to: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.issued_to.is_none()
    }

    pub fn holder(&self) -> Option<&UserId> {
        self.issued_to.as_ref()
    }

    pub fn state(&self) -> BookState {
        match &self.issued_to {
            None => BookState::Available,
            Some(to) => BookState::Issued { to: to.clone() },
        }
    }
}
