use crate::entry::{Ledger, LedgerEntry};
use crate::error::LedgerError;
use crate::row::LedgerRow;
use core_types::DerivedRecord;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The `LedgerRepository` provides the application's view of the ledger file.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    path: PathBuf,
    date_formats: Vec<String>,
}

impl LedgerRepository {
    pub fn new(path: impl Into<PathBuf>, date_formats: Vec<String>) -> Self {
        Self {
            path: path.into(),
            date_formats,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every row of the ledger. A missing file is an empty ledger.
    pub fn load(&self) -> Result<Ledger, LedgerError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Ledger file not found, starting empty.");
            return Ok(Ledger::default());
        }

        let file = File::open(&self.path)?;
        let ledger = read_ledger(file, &self.date_formats)?;
        info!(
            path = %self.path.display(),
            rows = ledger.entries.len(),
            unreadable = ledger.unreadable().count(),
            "Loaded ledger."
        );
        Ok(ledger)
    }

    /// Rewrites the ledger with freshly derived columns.
    ///
    /// The rows are written to a sibling temporary file first and moved into
    /// place, so a failed save leaves the previous ledger intact.
    pub fn save(&self, ledger: &Ledger, derived: &[DerivedRecord]) -> Result<(), LedgerError> {
        let rows = ledger.rewrite(derived)?;
        let staging = self.path.with_extension("csv.tmp");

        let result = File::create(&staging)
            .map_err(LedgerError::from)
            .and_then(|file| write_rows(file, &rows))
            .and_then(|()| fs::rename(&staging, &self.path).map_err(LedgerError::from));

        if let Err(e) = result {
            if let Err(cleanup) = fs::remove_file(&staging) {
                debug!(path = %staging.display(), error = %cleanup, "No staging file to remove.");
            }
            return Err(e);
        }

        info!(path = %self.path.display(), rows = rows.len(), "Saved ledger.");
        Ok(())
    }
}

/// Reads a ledger from CSV with a header row.
///
/// Blank rows are skipped. Rows whose raw numbers cannot be read are logged
/// and kept as unreadable entries.
pub fn read_ledger<R: Read, S: AsRef<str>>(
    reader: R,
    date_formats: &[S],
) -> Result<Ledger, LedgerError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut ledger = Ledger::default();

    for result in rdr.records() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                if let csv::ErrorKind::Io(_) = e.kind() {
                    return Err(e.into());
                }
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                warn!(line, error = %e, "Failed to decode ledger row.");
                ledger.lost_lines.push(line);
                continue;
            }
        };

        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let row: LedgerRow = match raw.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "Failed to decode ledger row.");
                ledger.lost_lines.push(line);
                continue;
            }
        };

        if row.is_blank() {
            continue;
        }

        let record = row.to_record(date_formats);
        if let Err(reason) = &record {
            let skipped = LedgerError::InvalidRow {
                line,
                reason: reason.clone(),
            };
            warn!(error = %skipped, symbol = %row.symbol, "Ledger row left out of reports.");
        }
        ledger.entries.push(LedgerEntry { line, row, record });
    }

    debug!(
        rows = ledger.entries.len(),
        lost = ledger.lost_lines.len(),
        "Parsed ledger rows."
    );
    Ok(ledger)
}

/// Writes ledger rows, header first.
pub fn write_rows<W: Write>(writer: W, rows: &[LedgerRow]) -> Result<(), LedgerError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Written explicitly so that an empty ledger still carries its header.
    wtr.write_record(LedgerRow::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::derive_records;
    use chrono::NaiveDate;
    use core_types::DEFAULT_DATE_FORMATS;
    use std::io::Cursor;

    const HEADER: &str =
        "symbol,strategy_tag,entry_price,entry_quantity,remaining_quantity,entry_date,exit_date,exit_price";

    fn read(text: &str) -> Ledger {
        read_ledger(Cursor::new(text.to_string()), DEFAULT_DATE_FORMATS).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tradebook-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn repository(path: &Path) -> LedgerRepository {
        let formats = DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect();
        LedgerRepository::new(path, formats)
    }

    #[test]
    fn test_reads_legacy_column_names() {
        let csv = "\
script_name,trade_base,price_in,quantity_in,quantity_left,date_in,amount_in,balance_left,date_out,price_out,P/L (INR),P/L in %,days_taken
TCS,AVG,3500,2,2,2024-03-01,7000,7000,,,,,
HDFC,LONG,1600.5,10,0,2024-01-10,16005,0,2024-02-09,1700,995,6.2,30
";
        let records = read(csv).records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol, "TCS");
        assert_eq!(records[0].exit_price, None);
        assert_eq!(records[1].strategy_tag, "LONG");
        assert_eq!(records[1].exit_date, NaiveDate::from_ymd_opt(2024, 2, 9));
    }

    #[test]
    fn test_unreadable_rows_are_kept_but_left_out_of_records() {
        let csv = format!(
            "{HEADER}
A,AVG,100,10,10,2024-01-01,,
,,,,,,,
B,AVG,1O0,10,10,2024-01-01,,
C,AVG,50,5,5,garbage,,
"
        );
        let ledger = read(&csv);

        let symbols: Vec<String> = ledger.records().into_iter().map(|r| r.symbol).collect();
        assert_eq!(symbols, vec!["A", "C"]);
        assert_eq!(ledger.entries.len(), 3);

        let unreadable: Vec<u64> = ledger.unreadable().map(|e| e.line).collect();
        assert_eq!(unreadable, vec![4]);
        assert_eq!(ledger.entries[2].line, 5);
        assert_eq!(ledger.records()[1].entry_date, None);
    }

    #[test]
    fn test_line_numbers_follow_multiline_fields() {
        let csv = format!(
            "{HEADER}
\"A
note\",AVG,100,10,10,2024-01-01,,
B,AVG,1O0,10,10,2024-01-01,,
"
        );
        let ledger = read(&csv);
        assert_eq!(ledger.entries[0].line, 2);
        assert_eq!(ledger.unreadable().map(|e| e.line).collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn test_rewrite_keeps_bad_rows_and_bad_dates() {
        let csv = format!(
            "{HEADER}
A,AVG,100,10,0,2024-01-01,2024-01-11,120
B,AVG,1O0,10,10,2024-01-01,,
C,AVG,50,5,5,2024-02-01,someday,
"
        );
        let ledger = read(&csv);
        let derived = derive_records(&ledger.records());

        let mut buffer = Vec::new();
        write_rows(&mut buffer, &ledger.rewrite(&derived).unwrap()).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with(&LedgerRow::HEADERS.join(",")));
        assert!(text.contains("A,AVG,100,10,0,2024-01-01,1000,0,2024-01-11,120,200,20,10"));
        assert!(text.contains("B,AVG,1O0,10,10,2024-01-01"));
        assert!(text.contains("someday"));

        let reread = read(&text);
        assert_eq!(reread.entries.len(), 3);
        assert_eq!(reread.records(), ledger.records());
        assert_eq!(reread.unreadable().count(), 1);
    }

    #[test]
    fn test_rewrite_rejects_mismatched_derivations() {
        let csv = format!("{HEADER}\nA,AVG,100,10,10,2024-01-01,,\n");
        let ledger = read(&csv);
        let other = read(&format!("{HEADER}\nZ,AVG,1,1,1,2024-01-01,,\n"));

        assert!(matches!(
            ledger.rewrite(&derive_records(&other.records())),
            Err(LedgerError::RecordMismatch(_))
        ));
        assert!(matches!(ledger.rewrite(&[]), Err(LedgerError::RecordMismatch(_))));
    }

    #[test]
    fn test_rewrite_refuses_lost_lines() {
        let ledger = Ledger {
            lost_lines: vec![7],
            ..Ledger::default()
        };
        assert!(matches!(
            ledger.rewrite(&[]),
            Err(LedgerError::UndecodableRows { lines }) if lines == vec![7]
        ));
    }

    #[test]
    fn test_empty_ledger_keeps_header() {
        let mut buffer = Vec::new();
        write_rows(&mut buffer, &[]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.trim_end(), LedgerRow::HEADERS.join(","));
    }

    #[test]
    fn test_repository_save_and_load() {
        let dir = scratch_dir("ledger");
        let path = dir.join("trades.csv");
        fs::write(
            &path,
            format!("{HEADER}\nA,AVG,100,10,0,2024-01-01,2024-01-11,120\nB,AVG,1O0,1,1,,,\n"),
        )
        .unwrap();
        let repo = repository(&path);

        let ledger = repo.load().unwrap();
        repo.save(&ledger, &derive_records(&ledger.records())).unwrap();

        let reloaded = repo.load().unwrap();
        assert_eq!(reloaded.records(), ledger.records());
        assert_eq!(reloaded.unreadable().count(), 1);
        assert!(!path.with_extension("csv.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = scratch_dir("missing");
        let ledger = repository(&dir.join("absent.csv")).load().unwrap();
        assert_eq!(ledger, Ledger::default());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_save_removes_staging_file() {
        let dir = scratch_dir("blocked");
        // A directory cannot be replaced by the staged file.
        let target = dir.join("ledger");
        fs::create_dir_all(&target).unwrap();
        let repo = repository(&target);

        assert!(repo.save(&Ledger::default(), &[]).is_err());
        assert!(!target.with_extension("csv.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
