use shelf_types::TransactionRecord;

use crate::error::LedgerError;

/// Write boundary for ledger appends.
pub trait LedgerWriter {
    /// Append a record and return its 1-based sequence number.
    fn append(&mut self, record: TransactionRecord) -> u64;
}

/// Read boundary for ledger queries, replay and validation.
pub trait LedgerReader {
    /// Every record, oldest first.
    fn all(&self) -> &[TransactionRecord];

    /// Records with sequence numbers in `from_seq..=to_seq` (1-based).
    fn read_range(&self, from_seq: u64, to_seq: u64) -> Result<&[TransactionRecord], LedgerError> {
        let all = self.all();
        let len = all.len() as u64;
        if from_seq == 0 || from_seq > to_seq || to_seq > len {
            return Err(LedgerError::InvalidRange {
                from: from_seq,
                to: to_seq,
            });
        }
        Ok(&all[(from_seq - 1) as usize..to_seq as usize])
    }

    fn len(&self) -> u64 {
        self.all().len() as u64
    }

    fn is_empty(&self) -> bool {
        self.all().is_empty()
    }

    /// The most recent record, if any.
    fn last(&self) -> Option<&TransactionRecord> {
        self.all().last()
    }
}
