/// Errors produced by ledger reads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid sequence range: from={from}, to={to}")]
    InvalidRange { from: u64, to: u64 },
}
