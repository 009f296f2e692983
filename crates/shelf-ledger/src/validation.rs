use std::collections::HashMap;

use serde::Serialize;

use shelf_types::{Action, BookId, UserId};

use crate::traits::LedgerReader;

/// Result of stream validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub record_count: u64,
    /// Every book alternates Issued, Returned, Issued, ... starting with Issued.
    pub alternation_valid: bool,
    /// Every return names the user the matching issue named.
    pub returns_attributed: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Record a finding from a check that runs outside the ledger, such as a
    /// comparison with the catalog.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

/// A specific inconsistency found during validation.
///
/// `seq` is the 1-based ledger position, or 0 when the finding is not tied
/// to a single record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub seq: u64,
    pub kind: ViolationKind,
    pub description: String,
}

impl Violation {
    pub fn new(seq: u64, kind: ViolationKind, description: impl Into<String>) -> Self {
        Self {
            seq,
            kind,
            description: description.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    /// A book was issued while the ledger still had it on loan.
    DoubleIssue,
    /// A book was returned while the ledger had it on the shelf.
    ReturnWithoutIssue,
    /// A return names a different user than the preceding issue.
    ReturnByOtherUser,
    /// A record references a book missing from the catalog.
    UnknownBook,
    /// A record or a catalog holder references an unregistered user.
    UnknownUser,
    /// The catalog holder disagrees with the replayed ledger.
    HolderDrift,
}

/// Ledger integrity validator.
pub struct StreamValidator;

impl StreamValidator {
    /// Check the issue/return state machine for every book in the ledger.
    pub fn validate_stream<R: LedgerReader>(reader: &R) -> ValidationReport {
        let mut holders: HashMap<&BookId, &UserId> = HashMap::new();
        let mut violations = Vec::new();
        let mut alternation_valid = true;
        let mut returns_attributed = true;

        for (index, record) in reader.all().iter().enumerate() {
            let seq = (index + 1) as u64;
            match record.action {
                Action::Issued => {
                    if let Some(holder) = holders.get(&record.book_id) {
                        alternation_valid = false;
                        violations.push(Violation::new(
                            seq,
                            ViolationKind::DoubleIssue,
                            format!(
                                "book {} issued to {} while still held by {holder}",
                                record.book_id, record.user_id
                            ),
                        ));
                    }
                    holders.insert(&record.book_id, &record.user_id);
                }
                Action::Returned => match holders.remove(&record.book_id) {
                    None => {
                        alternation_valid = false;
                        violations.push(Violation::new(
                            seq,
                            ViolationKind::ReturnWithoutIssue,
                            format!("book {} returned but was not on loan", record.book_id),
                        ));
                    }
                    Some(holder) if holder != &record.user_id => {
                        returns_attributed = false;
                        violations.push(Violation::new(
                            seq,
                            ViolationKind::ReturnByOtherUser,
                            format!(
                                "book {} issued to {holder} but returned by {}",
                                record.book_id, record.user_id
                            ),
                        ));
                    }
                    Some(_) => {}
                },
            }
        }

        ValidationReport {
            record_count: reader.len(),
            alternation_valid,
            returns_attributed,
            violations,
        }
    }
}
