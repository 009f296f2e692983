use serde::{Deserialize, Serialize};
use tracing::debug;

use shelf_types::TransactionRecord;

use crate::traits::{LedgerReader, LedgerWriter};

/// Append-only, ordered history of issue/return transactions.
///
/// Append order is chronological order. Records are never edited or
/// removed; the only way in is [`LedgerWriter::append`]. Serializes as a
/// plain JSON array of records, which is the `ledger.json` layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<TransactionRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from previously persisted records, keeping their order.
    pub fn from_records(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }
}

impl LedgerWriter for Ledger {
    fn append(&mut self, record: TransactionRecord) -> u64 {
        self.records.push(record);
        let seq = self.records.len() as u64;
        debug!(seq, "ledger record appended");
        seq
    }
}

impl LedgerReader for Ledger {
    fn all(&self) -> &[TransactionRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
