use std::fmt;

use shelf_store::Collection;
use shelf_types::{non_blank, BookId, TransactionRecord, UserId};

use crate::error::LibraryResult;

/// A single state-changing request against a [`crate::Library`].
///
/// Build commands with the constructors below; they reject empty ids and
/// blank titles or names before anything touches the library. Titles and
/// names are trimmed, ids are kept as given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    AddBook { id: BookId, title: String },
    AddUser { id: UserId, name: String },
    IssueBook { book: BookId, user: UserId },
    ReturnBook { book: BookId },
}

impl Command {
    pub fn add_book(id: &str, title: &str) -> LibraryResult<Self> {
        Ok(Command::AddBook {
            id: BookId::parse(id)?,
            title: non_blank("book title", title)?,
        })
    }

    pub fn add_user(id: &str, name: &str) -> LibraryResult<Self> {
        Ok(Command::AddUser {
            id: UserId::parse(id)?,
            name: non_blank("user name", name)?,
        })
    }

    pub fn issue_book(book: &str, user: &str) -> LibraryResult<Self> {
        Ok(Command::IssueBook {
            book: BookId::parse(book)?,
            user: UserId::parse(user)?,
        })
    }

    pub fn return_book(book: &str) -> LibraryResult<Self> {
        Ok(Command::ReturnBook {
            book: BookId::parse(book)?,
        })
    }

    /// Short verb used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddBook { .. } => "add-book",
            Command::AddUser { .. } => "add-user",
            Command::IssueBook { .. } => "issue",
            Command::ReturnBook { .. } => "return",
        }
    }
}

/// What a successful command did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    BookAdded { id: BookId, title: String },
    UserAdded { id: UserId, name: String },
    Issued(TransactionRecord),
    Returned(TransactionRecord),
}

impl Outcome {
    /// Collections this outcome changed, in the order they must be saved.
    ///
    /// The ledger goes first: if the catalog write then fails, the files
    /// never show a loan that has no ledger record.
    pub fn touched(&self) -> &'static [Collection] {
        match self {
            Outcome::BookAdded { .. } => &[Collection::Books],
            Outcome::UserAdded { .. } => &[Collection::Users],
            Outcome::Issued(_) | Outcome::Returned(_) => &[Collection::Ledger, Collection::Books],
        }
    }

    /// The ledger row appended, for issue and return.
    pub fn record(&self) -> Option<&TransactionRecord> {
        match self {
            Outcome::Issued(r) | Outcome::Returned(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::BookAdded { title, .. } => write!(f, "Added book '{title}'"),
            Outcome::UserAdded { name, .. } => write!(f, "Added user '{name}'"),
            Outcome::Issued(r) => write!(f, "Issued '{}' to {}", r.book_title, r.user_name),
            Outcome::Returned(r) => write!(f, "Returned '{}' by {}", r.book_title, r.user_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use shelf_types::TypeError;

    use super::*;
    use crate::error::LibraryError;

    #[test]
    fn constructors_trim_text_but_not_ids() {
        let cmd = Command::add_book(" B1", " Dune ").unwrap();
        assert_eq!(
            cmd,
            Command::AddBook {
                id: BookId::parse(" B1").unwrap(),
                title: "Dune".into(),
            }
        );
    }

    #[test]
    fn blank_fields_are_missing_input() {
        let err = Command::add_user("U1", "  ").unwrap_err();
        assert!(matches!(
            err,
            LibraryError::MissingInput(TypeError::Blank { field: "user name" })
        ));
        assert!(Command::add_book("", "Dune").is_err());
        assert!(Command::issue_book("B1", "").is_err());
        assert!(Command::return_book("").is_err());
    }

    #[test]
    fn outcome_touches_expected_collections() {
        let record = TransactionRecord::issued(
            BookId::parse("B1").unwrap(),
            "Dune",
            UserId::parse("U1").unwrap(),
            "Ann",
        );
        let issued = Outcome::Issued(record.clone());
        assert_eq!(issued.touched(), &[Collection::Ledger, Collection::Books]);
        assert_eq!(issued.record(), Some(&record));
        assert_eq!(issued.to_string(), "Issued 'Dune' to Ann");

        let added = Outcome::UserAdded {
            id: UserId::parse("U1").unwrap(),
            name: "Ann".into(),
        };
        assert_eq!(added.touched(), &[Collection::Users]);
        assert!(added.record().is_none());
    }

    #[test]
    fn command_names() {
        assert_eq!(Command::return_book("B1").unwrap().name(), "return");
        assert_eq!(Command::issue_book("B1", "U1").unwrap().name(), "issue");
    }
}
