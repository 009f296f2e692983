use serde::Serialize;

use shelf_types::{Action, BookId, TransactionRecord, UserId};

use crate::error::LedgerError;
use crate::replay::ReplayEngine;
use crate::traits::LedgerReader;

/// A ledger record paired with its 1-based position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub seq: u64,
    pub record: TransactionRecord,
}

/// Aggregate counts over the whole ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub records: u64,
    pub issued: u64,
    pub returned: u64,
    /// Books whose last record is an issue.
    pub outstanding: u64,
}

/// Read-only views over the ledger.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    /// Every record with its sequence number, oldest first.
    pub fn entries<R: LedgerReader>(reader: &R) -> Vec<LedgerEntry> {
        Self::filtered(reader, |_| true)
    }

    /// The last `limit` records, still oldest first.
    pub fn tail<R: LedgerReader>(reader: &R, limit: usize) -> Vec<LedgerEntry> {
        let mut entries = Self::entries(reader);
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
        entries
    }

    /// Records `from..=to` by sequence number.
    pub fn range<R: LedgerReader>(
        reader: &R,
        from: u64,
        to: u64,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let records = reader.read_range(from, to)?;
        Ok((from..)
            .zip(records)
            .map(|(seq, record)| LedgerEntry {
                seq,
                record: record.clone(),
            })
            .collect())
    }

    pub fn book_history<R: LedgerReader>(reader: &R, book: &BookId) -> Vec<LedgerEntry> {
        Self::filtered(reader, |r| &r.book_id == book)
    }

    pub fn user_history<R: LedgerReader>(reader: &R, user: &UserId) -> Vec<LedgerEntry> {
        Self::filtered(reader, |r| &r.user_id == user)
    }

    pub fn summary<R: LedgerReader>(reader: &R) -> LedgerSummary {
        let replay = ReplayEngine::replay_from_start(reader);
        LedgerSummary {
            records: reader.len(),
            issued: replay.issued,
            returned: replay.returned,
            outstanding: replay.outstanding().count() as u64,
        }
    }

    fn filtered<R, F>(reader: &R, keep: F) -> Vec<LedgerEntry>
    where
        R: LedgerReader,
        F: Fn(&TransactionRecord) -> bool,
    {
        reader
            .all()
            .iter()
            .enumerate()
            .filter(|(_, record)| keep(record))
            .map(|(index, record)| LedgerEntry {
                seq: (index + 1) as u64,
                record: record.clone(),
            })
            .collect()
    }
}

impl LedgerEntry {
    pub fn is_issue(&self) -> bool {
        self.record.action == Action::Issued
    }
}
