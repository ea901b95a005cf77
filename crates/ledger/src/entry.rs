use crate::error::LedgerError;
use crate::row::LedgerRow;
use core_types::{DerivedRecord, TradeRecord};

/// One non-blank row of the ledger file, as it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Line in the file where the row starts.
    pub line: u64,
    pub row: LedgerRow,
    /// The raw lot, or why its numbers could not be read.
    pub record: Result<TradeRecord, String>,
}

/// The contents of a ledger file.
///
/// Rows that cannot be read are kept alongside the readable ones so that
/// rewriting the file never drops what the user typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub entries: Vec<LedgerEntry>,
    /// Lines the CSV layer could not decode at all. Their text is not held,
    /// so a ledger with lost lines is never rewritten.
    pub lost_lines: Vec<u64>,
}

impl Ledger {
    /// The readable lots, in file order.
    pub fn records(&self) -> Vec<TradeRecord> {
        self.entries
            .iter()
            .filter_map(|entry| entry.record.as_ref().ok())
            .cloned()
            .collect()
    }

    /// Rows left out of the reports.
    pub fn unreadable(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(|entry| entry.record.is_err())
    }

    /// The rows to write back.
    ///
    /// `derived` must hold the derivation of `records()`, in the same order.
    /// Readable rows take their recomputed columns, keeping any date text that
    /// could not be parsed. Unreadable rows are returned unchanged.
    pub fn rewrite(&self, derived: &[DerivedRecord]) -> Result<Vec<LedgerRow>, LedgerError> {
        if !self.lost_lines.is_empty() {
            return Err(LedgerError::UndecodableRows {
                lines: self.lost_lines.clone(),
            });
        }

        let mut derived = derived.iter();
        let mut rows = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            match &entry.record {
                Ok(record) => {
                    let fresh = derived
                        .next()
                        .filter(|d| d.record == *record)
                        .ok_or_else(|| {
                            LedgerError::RecordMismatch(format!(
                                "no derived record for line {}",
                                entry.line
                            ))
                        })?;
                    rows.push(LedgerRow::from_derived(fresh).keep_unread_dates(&entry.row));
                }
                Err(_) => rows.push(entry.row.clone()),
            }
        }

        if derived.next().is_some() {
            return Err(LedgerError::RecordMismatch(
                "more derived records than ledger rows".to_string(),
            ));
        }

        Ok(rows)
    }
}
