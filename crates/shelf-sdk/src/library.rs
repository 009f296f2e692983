use serde::Serialize;
use tracing::{debug, info};

use shelf_ledger::{
    Ledger, LedgerEntry, LedgerSummary, LedgerWriter, ProjectionBuilder, ReplayEngine,
    StreamValidator, ValidationReport, Violation, ViolationKind,
};
use shelf_store::{Catalog, Collections, Membership};
use shelf_types::{non_blank, Book, BookId, BookState, TransactionRecord, UserId};

use crate::command::{Command, Outcome};
use crate::error::{LibraryError, LibraryResult};

/// Headline counts for a status view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LibrarySummary {
    pub books: usize,
    pub available: usize,
    pub issued: usize,
    pub users: usize,
    pub ledger: LedgerSummary,
}

/// The transaction engine and the state it guards.
///
/// A `Library` owns the catalog, the membership list and the ledger. Every
/// mutation goes through one of its methods, which check the invariants
/// first and change nothing when a check fails:
///
/// - book and user ids are unique,
/// - a book is issued only while available, to a registered user,
/// - a book is returned only while issued,
/// - every issue and return appends exactly one ledger record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Library {
    state: Collections,
}

impl Library {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from previously persisted collections.
    pub fn from_collections(state: Collections) -> Self {
        Self { state }
    }

    pub fn collections(&self) -> &Collections {
        &self.state
    }

    pub fn into_collections(self) -> Collections {
        self.state
    }

    pub fn books(&self) -> &Catalog {
        &self.state.books
    }

    pub fn users(&self) -> &Membership {
        &self.state.users
    }

    pub fn ledger(&self) -> &Ledger {
        &self.state.ledger
    }

    // ---- Commands ----

    /// Run a command. On error nothing has changed.
    pub fn apply(&mut self, command: Command) -> LibraryResult<Outcome> {
        match command {
            Command::AddBook { id, title } => {
                self.add_book(id.clone(), &title)?;
                Ok(Outcome::BookAdded { id, title })
            }
            Command::AddUser { id, name } => {
                self.add_user(id.clone(), &name)?;
                Ok(Outcome::UserAdded { id, name })
            }
            Command::IssueBook { book, user } => self.issue_book(&book, &user).map(Outcome::Issued),
            Command::ReturnBook { book } => self.return_book(&book).map(Outcome::Returned),
        }
    }

    pub fn add_book(&mut self, id: BookId, title: &str) -> LibraryResult<()> {
        let title = non_blank("book title", title)?;
        self.state.books.add_book(id.clone(), title)?;
        debug!(book = %id, "book added");
        Ok(())
    }

    pub fn add_user(&mut self, id: UserId, name: &str) -> LibraryResult<()> {
        let name = non_blank("user name", name)?;
        self.state.users.add_user(id.clone(), name)?;
        debug!(user = %id, "user added");
        Ok(())
    }

    /// Lend `book` to `user` and record it.
    ///
    /// Checked in order: the book exists, the book is available, the user
    /// exists. An empty catalog or membership list therefore fails with
    /// `NotFound` on its own.
    pub fn issue_book(&mut self, book: &BookId, user: &UserId) -> LibraryResult<TransactionRecord> {
        let entry = self.state.books.require(book)?;
        if let BookState::Issued { to } = entry.state() {
            return Err(LibraryError::InvalidState {
                book: book.clone(),
                state: BookState::Issued { to },
            });
        }
        let title = entry.title.clone();
        let name = self.state.users.require(user)?.to_string();

        self.state.books.set_holder(book, Some(user.clone()))?;
        let record = TransactionRecord::issued(book.clone(), title, user.clone(), name);
        let seq = self.state.ledger.append(record.clone());
        info!(book = %book, user = %user, seq, "book issued");
        Ok(record)
    }

    /// Take `book` back from whoever holds it and record it.
    ///
    /// The record names the previous holder, who must still be registered.
    pub fn return_book(&mut self, book: &BookId) -> LibraryResult<TransactionRecord> {
        let entry = self.state.books.require(book)?;
        let holder = match entry.state() {
            BookState::Available => {
                return Err(LibraryError::InvalidState {
                    book: book.clone(),
                    state: BookState::Available,
                })
            }
            BookState::Issued { to } => to,
        };
        let title = entry.title.clone();
        let name = self.state.users.require(&holder)?.to_string();

        self.state.books.set_holder(book, None)?;
        let record = TransactionRecord::returned(book.clone(), title, holder, name);
        let seq = self.state.ledger.append(record.clone());
        info!(book = %book, user = %record.user_id, seq, "book returned");
        Ok(record)
    }

    // ---- Queries ----

    pub fn summary(&self) -> LibrarySummary {
        let available = self.state.books.available().count();
        LibrarySummary {
            books: self.state.books.len(),
            available,
            issued: self.state.books.len() - available,
            users: self.state.users.len(),
            ledger: ProjectionBuilder::summary(&self.state.ledger),
        }
    }

    /// Ledger entries `from..=to`, 1-based.
    pub fn ledger_range(&self, from: u64, to: u64) -> LibraryResult<Vec<LedgerEntry>> {
        Ok(ProjectionBuilder::range(&self.state.ledger, from, to)?)
    }

    pub fn book_history(&self, book: &BookId) -> LibraryResult<Vec<LedgerEntry>> {
        self.state.books.require(book)?;
        Ok(ProjectionBuilder::book_history(&self.state.ledger, book))
    }

    pub fn user_history(&self, user: &UserId) -> LibraryResult<Vec<LedgerEntry>> {
        self.state.users.require(user)?;
        Ok(ProjectionBuilder::user_history(&self.state.ledger, user))
    }

    /// Check the ledger on its own and against the catalog and membership.
    pub fn verify(&self) -> ValidationReport {
        let mut report = StreamValidator::validate_stream(&self.state.ledger);
        let books = &self.state.books;
        let users = &self.state.users;

        for entry in ProjectionBuilder::entries(&self.state.ledger) {
            let record = &entry.record;
            if !books.contains(&record.book_id) {
                report.push(Violation::new(
                    entry.seq,
                    ViolationKind::UnknownBook,
                    format!("record references unknown book {}", record.book_id),
                ));
            }
            if !users.contains(&record.user_id) {
                report.push(Violation::new(
                    entry.seq,
                    ViolationKind::UnknownUser,
                    format!("record references unknown user {}", record.user_id),
                ));
            }
        }

        let replay = ReplayEngine::replay_from_start(&self.state.ledger);
        for (id, book) in books.iter() {
            if let Some(holder) = book.holder() {
                if !users.contains(holder) {
                    report.push(Violation::new(
                        0,
                        ViolationKind::UnknownUser,
                        format!("book {id} is held by unknown user {holder}"),
                    ));
                }
            }
            let replayed = replay.holder_of(id);
            if replayed != book.holder() {
                report.push(Violation::new(
                    0,
                    ViolationKind::HolderDrift,
                    format!(
                        "book {id}: catalog says {}, ledger says {}",
                        book.state(),
                        describe(replayed)
                    ),
                ));
            }
        }
        report
    }

    /// Look up a book, failing with `NotFound`.
    pub fn book(&self, id: &BookId) -> LibraryResult<&Book> {
        Ok(self.state.books.require(id)?)
    }

    /// Display name of a user, failing with `NotFound`.
    pub fn user_name(&self, id: &UserId) -> LibraryResult<&str> {
        Ok(self.state.users.require(id)?)
    }
}

fn describe(holder: Option<&UserId>) -> String {
    match holder {
        Some(user) => format!("issued to {user}"),
        None => "available".into(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use shelf_ledger::LedgerReader;
    use shelf_types::{Action, EntityKind};

    use super::*;

    fn book(id: &str) -> BookId {
        BookId::parse(id).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn stocked() -> Library {
        let mut lib = Library::new();
        lib.add_book(book("B1"), "Dune").unwrap();
        lib.add_user(user("U1"), "Ann").unwrap();
        lib
    }

    #[test]
    fn issue_and_return_scenario() {
        let mut lib = stocked();

        lib.issue_book(&book("B1"), &user("U1")).unwrap();
        assert_eq!(lib.books().get(&book("B1")).unwrap().holder(), Some(&user("U1")));
        let rows: Vec<_> = lib
            .ledger()
            .all()
            .iter()
            .map(|r| {
                (
                    r.book_id.as_str(),
                    r.book_title.as_str(),
                    r.user_id.as_str(),
                    r.user_name.as_str(),
                    r.action,
                )
            })
            .collect();
        assert_eq!(rows, vec![("B1", "Dune", "U1", "Ann", Action::Issued)]);

        let returned = lib.return_book(&book("B1")).unwrap();
        assert!(lib.books().get(&book("B1")).unwrap().holder().is_none());
        assert_eq!(lib.ledger().len(), 2);
        assert_eq!(returned.action, Action::Returned);
        assert_eq!(returned.user_id, user("U1"));
        assert_eq!(returned.user_name, "Ann");
    }

    #[test]
    fn new_books_have_no_holder() {
        let lib = stocked();
        assert!(lib.books().iter().all(|(_, b)| b.holder().is_none()));
    }

    #[test]
    fn duplicate_book_leaves_state_alone() {
        let mut lib = stocked();
        lib.issue_book(&book("B1"), &user("U1")).unwrap();
        let before = lib.clone();

        let err = lib.add_book(book("B1"), "Emma").unwrap_err();
        assert!(matches!(err, LibraryError::DuplicateKey { kind: EntityKind::Book, .. }));
        assert_eq!(lib, before);
    }

    #[test]
    fn duplicate_user_leaves_state_alone() {
        let mut lib = stocked();
        let before = lib.clone();
        let err = lib.add_user(user("U1"), "Bo").unwrap_err();
        assert!(matches!(err, LibraryError::DuplicateKey { kind: EntityKind::User, .. }));
        assert_eq!(lib, before);
    }

    #[test]
    fn issuing_an_issued_book_is_invalid_state() {
        let mut lib = stocked();
        lib.add_user(user("U2"), "Bo").unwrap();
        lib.issue_book(&book("B1"), &user("U1")).unwrap();

        let err = lib.issue_book(&book("B1"), &user("U2")).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::InvalidState { state: BookState::Issued { ref to }, .. } if *to == user("U1")
        ));
        assert_eq!(lib.ledger().len(), 1);
        assert_eq!(lib.books().get(&book("B1")).unwrap().holder(), Some(&user("U1")));
    }

    #[test]
    fn returning_an_available_book_is_invalid_state() {
        let mut lib = stocked();
        let err = lib.return_book(&book("B1")).unwrap_err();
        assert!(matches!(
            err,
            LibraryError::InvalidState { state: BookState::Available, .. }
        ));
        assert!(lib.ledger().is_empty());
    }

    #[test]
    fn issue_requires_known_book_and_user() {
        let mut lib = stocked();
        assert!(matches!(
            lib.issue_book(&book("B9"), &user("U1")).unwrap_err(),
            LibraryError::NotFound { kind: EntityKind::Book, .. }
        ));
        assert!(matches!(
            lib.issue_book(&book("B1"), &user("U9")).unwrap_err(),
            LibraryError::NotFound { kind: EntityKind::User, .. }
        ));
        assert!(lib.ledger().is_empty());
        assert!(lib.books().get(&book("B1")).unwrap().is_available());
    }

    #[test]
    fn issue_in_empty_library_is_refused() {
        let mut lib = Library::new();
        assert!(matches!(
            lib.issue_book(&book("B1"), &user("U1")).unwrap_err(),
            LibraryError::NotFound { kind: EntityKind::Book, .. }
        ));

        lib.add_book(book("B1"), "Dune").unwrap();
        assert!(matches!(
            lib.issue_book(&book("B1"), &user("U1")).unwrap_err(),
            LibraryError::NotFound { kind: EntityKind::User, .. }
        ));
    }

    #[test]
    fn return_unknown_book_is_not_found() {
        let mut lib = stocked();
        assert!(matches!(
            lib.return_book(&book("B9")).unwrap_err(),
            LibraryError::NotFound { kind: EntityKind::Book, .. }
        ));
    }

    #[test]
    fn blank_title_is_missing_input() {
        let mut lib = Library::new();
        let err = lib.add_book(book("B1"), "   ").unwrap_err();
        assert!(matches!(err, LibraryError::MissingInput(_)));
        assert!(lib.books().is_empty());
    }

    #[test]
    fn apply_reports_outcomes() {
        let mut lib = Library::new();
        let added = lib.apply(Command::add_book("B1", "Dune").unwrap()).unwrap();
        assert_eq!(added.to_string(), "Added book 'Dune'");
        lib.apply(Command::add_user("U1", "Ann").unwrap()).unwrap();

        let issued = lib.apply(Command::issue_book("B1", "U1").unwrap()).unwrap();
        assert_eq!(issued.to_string(), "Issued 'Dune' to Ann");
        let returned = lib.apply(Command::return_book("B1").unwrap()).unwrap();
        assert_eq!(returned.to_string(), "Returned 'Dune' by Ann");
    }

    #[test]
    fn lookups() {
        let lib = stocked();
        assert_eq!(lib.book(&book("B1")).unwrap().title, "Dune");
        assert_eq!(lib.user_name(&user("U1")).unwrap(), "Ann");
        assert!(matches!(
            lib.user_name(&user("U9")).unwrap_err(),
            LibraryError::NotFound { kind: EntityKind::User, .. }
        ));
    }

    #[test]
    fn summary_counts() {
        let mut lib = stocked();
        lib.add_book(book("B2"), "Emma").unwrap();
        lib.issue_book(&book("B1"), &user("U1")).unwrap();

        let summary = lib.summary();
        assert_eq!(summary.books, 2);
        assert_eq!(summary.available, 1);
        assert_eq!(summary.issued, 1);
        assert_eq!(summary.users, 1);
        assert_eq!(summary.ledger.records, 1);
        assert_eq!(summary.ledger.outstanding, 1);
    }

    #[test]
    fn histories() {
        let mut lib = stocked();
        lib.add_book(book("B2"), "Emma").unwrap();
        lib.issue_book(&book("B1"), &user("U1")).unwrap();
        lib.issue_book(&book("B2"), &user("U1")).unwrap();
        lib.return_book(&book("B1")).unwrap();

        let b1: Vec<u64> = lib.book_history(&book("B1")).unwrap().iter().map(|e| e.seq).collect();
        assert_eq!(b1, vec![1, 3]);
        assert_eq!(lib.user_history(&user("U1")).unwrap().len(), 3);
        assert!(lib.book_history(&book("B9")).is_err());
        assert!(lib.user_history(&user("U9")).is_err());
    }

    #[test]
    fn ledger_range_is_checked() {
        let mut lib = stocked();
        lib.issue_book(&book("B1"), &user("U1")).unwrap();
        lib.return_book(&book("B1")).unwrap();

        let entries = lib.ledger_range(2, 2).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].record.action, Action::Returned);
        assert!(matches!(lib.ledger_range(0, 1).unwrap_err(), LibraryError::Ledger(_)));
        assert!(matches!(lib.ledger_range(1, 3).unwrap_err(), LibraryError::Ledger(_)));
    }

    #[test]
    fn engine_history_verifies_clean() {
        let mut lib = stocked();
        lib.issue_book(&book("B1"), &user("U1")).unwrap();
        lib.return_book(&book("B1")).unwrap();
        lib.issue_book(&book("B1"), &user("U1")).unwrap();
        assert!(lib.verify().is_valid());
    }

    #[test]
    fn verify_detects_catalog_drift() {
        let mut state = stocked().into_collections();
        state.books.set_holder(&book("B1"), Some(user("U1"))).unwrap();
        let lib = Library::from_collections(state);

        let report = lib.verify();
        assert!(!report.is_valid());
        assert!(report
            .violations
            .iter()
            .any(|v| v.kind == ViolationKind::HolderDrift));
    }

    #[test]
    fn verify_detects_unknown_references() {
        let mut state = Collections::default();
        state.books.add_book(book("B1"), "Dune").unwrap();
        state
            .ledger
            .append(TransactionRecord::issued(book("B1"), "Dune", user("U1"), "Ann"));
        state
            .ledger
            .append(TransactionRecord::returned(book("B1"), "Dune", user("U1"), "Ann"));
        state
            .ledger
            .append(TransactionRecord::issued(book("B7"), "Lost", user("U1"), "Ann"));

        let report = Library::from_collections(state).verify();
        let kinds: Vec<ViolationKind> = report.violations.iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::UnknownBook));
        assert!(kinds.contains(&ViolationKind::UnknownUser));
    }

    #[derive(Clone, Debug)]
    enum Op {
        Issue(u8, u8),
        Return(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4, 0u8..3).prop_map(|(b, u)| Op::Issue(b, u)),
            (0u8..4).prop_map(Op::Return),
        ]
    }

    proptest! {
        #[test]
        fn ledger_counts_successful_transitions(ops in prop::collection::vec(op(), 0..40)) {
            let mut lib = Library::new();
            for b in 0..3u8 {
                lib.add_book(book(&format!("B{b}")), "title").unwrap();
            }
            for u in 0..2u8 {
                lib.add_user(user(&format!("U{u}")), "name").unwrap();
            }

            let mut successes = 0u64;
            for op in ops {
                let before = lib.clone();
                let result = match op {
                    Op::Issue(b, u) => lib
                        .issue_book(&book(&format!("B{b}")), &user(&format!("U{u}")))
                        .map(|_| ()),
                    Op::Return(b) => lib.return_book(&book(&format!("B{b}"))).map(|_| ()),
                };
                match result {
                    Ok(()) => successes += 1,
                    Err(_) => prop_assert_eq!(&lib, &before),
                }
            }

            prop_assert_eq!(lib.ledger().len(), successes);
            prop_assert!(lib.verify().is_valid());
        }

        #[test]
        fn duplicate_adds_never_mutate(title in "[A-Za-z ]{1,12}", name in "[A-Za-z]{1,8}") {
            let mut lib = stocked();
            let before = lib.clone();
            let book_err = lib.add_book(book("B1"), &format!("x{title}")).unwrap_err();
            let is_dup_book = matches!(book_err, LibraryError::DuplicateKey { .. });
            prop_assert!(is_dup_book);
            let user_err = lib.add_user(user("U1"), &name).unwrap_err();
            let is_dup_user = matches!(user_err, LibraryError::DuplicateKey { .. });
            prop_assert!(is_dup_user);
            prop_assert_eq!(lib, before);
        }
    }
}
