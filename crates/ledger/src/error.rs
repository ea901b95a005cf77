use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to access the ledger file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read or write CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {line} is not a valid trade record: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("Refusing to rewrite the ledger, lines {lines:?} could not be decoded")]
    UndecodableRows { lines: Vec<u64> },

    #[error("Derived records do not match the ledger: {0}")]
    RecordMismatch(String),
}
