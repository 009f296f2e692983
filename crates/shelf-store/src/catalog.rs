//! The book catalog.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shelf_types::{Book, BookId, EntityKind, UserId};

use crate::error::{StoreError, StoreResult};

/// Every book the library owns, keyed by id.
///
/// Books are added once and never removed. The holder is changed only by
/// the transaction engine, through [`Catalog::set_holder`], after it has
/// validated the transition. Serializes as the `books.json` object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    books: BTreeMap<BookId, Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book that nobody holds.
    ///
    /// Fails with [`StoreError::DuplicateKey`] if `id` is taken; the
    /// existing entry is left untouched.
    pub fn add_book(&mut self, id: BookId, title: impl Into<String>) -> StoreResult<&Book> {
        match self.books.entry(id) {
            Entry::Occupied(slot) => Err(StoreError::DuplicateKey {
                kind: EntityKind::Book,
                id: slot.key().to_string(),
            }),
            Entry::Vacant(slot) => {
                let book: &Book = slot.insert(Book::new(title));
                Ok(book)
            }
        }
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.get(id)
    }

    /// Like [`Catalog::get`], but a missing id is an error.
    pub fn require(&self, id: &BookId) -> StoreResult<&Book> {
        self.books.get(id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Book,
            id: id.to_string(),
        })
    }

    pub fn contains(&self, id: &BookId) -> bool {
        self.books.contains_key(id)
    }

    /// `true` iff the book exists and nobody holds it.
    pub fn is_available(&self, id: &BookId) -> StoreResult<bool> {
        self.require(id).map(Book::is_available)
    }

    /// Overwrite the holder of `id` and return the previous one.
    ///
    /// No state checks happen here; callers validate the transition.
    pub fn set_holder(&mut self, id: &BookId, holder: Option<UserId>) -> StoreResult<Option<UserId>> {
        let book = self.books.get_mut(id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Book,
            id: id.to_string(),
        })?;
        Ok(std::mem::replace(&mut book.issued_to, holder))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// All books, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&BookId, &Book)> {
        self.books.iter()
    }

    /// Books on the shelf, ordered by id.
    pub fn available(&self) -> impl Iterator<Item = (&BookId, &Book)> {
        self.books.iter().filter(|(_, book)| book.is_available())
    }

    /// Books on loan, ordered by id.
    pub fn issued(&self) -> impl Iterator<Item = (&BookId, &Book)> {
        self.books.iter().filter(|(_, book)| !book.is_available())
    }
}
