use std::collections::BTreeMap;

use shelf_types::{Action, BookId, UserId};

use crate::traits::LedgerReader;

/// Result of folding the ledger into per-book holders.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ReplayResult {
    /// Every book the ledger mentions, mapped to its holder after the last
    /// record for that book (`None` once returned).
    pub holders: BTreeMap<BookId, Option<UserId>>,
    pub issued: u64,
    pub returned: u64,
}

impl ReplayResult {
    /// Books the replay leaves on loan.
    pub fn outstanding(&self) -> impl Iterator<Item = (&BookId, &UserId)> {
        self.holders
            .iter()
            .filter_map(|(book, holder)| holder.as_ref().map(|user| (book, user)))
    }

    /// Holder of `book` according to the ledger. Books never issued are
    /// reported as on the shelf.
    pub fn holder_of(&self, book: &BookId) -> Option<&UserId> {
        self.holders.get(book).and_then(Option::as_ref)
    }
}

/// Deterministic replay of the ledger from its first record.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Apply every record in order. Replay does not judge the history;
    /// out-of-order records are reported by [`crate::StreamValidator`].
    pub fn replay_from_start<R: LedgerReader>(reader: &R) -> ReplayResult {
        let mut result = ReplayResult::default();
        for record in reader.all() {
            match record.action {
                Action::Issued => {
                    result
                        .holders
                        .insert(record.book_id.clone(), Some(record.user_id.clone()));
                    result.issued += 1;
                }
                Action::Returned => {
                    result.holders.insert(record.book_id.clone(), None);
                    result.returned += 1;
                }
            }
        }
        result
    }
}
