use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::ids::{BookId, UserId};

/// One row of the transaction ledger.
///
/// Title and name are copied in at the time of the transaction so the row
/// reads on its own. On disk a record is a 5-element array:
/// `[bookId, bookTitle, userId, userName, action]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordRow", into = "RecordRow")]
pub struct TransactionRecord {
    pub book_id: BookId,
    pub book_title: String,
    pub user_id: UserId,
    pub user_name: String,
    pub action: Action,
}

/// Positional wire form of [`TransactionRecord`].
#[derive(Serialize, Deserialize)]
struct RecordRow(BookId, String, UserId, String, Action);

impl From<RecordRow> for TransactionRecord {
    fn from(RecordRow(book_id, book_title, user_id, user_name, action): RecordRow) -> Self {
        Self {
            book_id,
            book_title,
            user_id,
            user_name,
            action,
        }
    }
}

impl From<TransactionRecord> for RecordRow {
    fn from(r: TransactionRecord) -> Self {
        RecordRow(r.book_id, r.book_title, r.user_id, r.user_name, r.action)
    }
}

impl TransactionRecord {
    pub fn issued(
        book_id: BookId,
        book_title: impl Into<String>,
        user_id: UserId,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            book_id,
            book_title: book_title.into(),
            user_id,
            user_name: user_name.into(),
            action: Action::Issued,
        }
    }

    pub fn returned(
        book_id: BookId,
        book_title: impl Into<String>,
        user_id: UserId,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            action: Action::Returned,
            ..Self::issued(book_id, book_title, user_id, user_name)
        }
    }
}
