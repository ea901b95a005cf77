//! # Tradebook Ledger Crate
//!
//! The flat-file boundary of the system: one CSV file, one row per lot.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** All CSV-specific logic lives here. The rest of the application sees
//!   `TradeRecord`s going in and `DerivedRecord`s coming out.
//! - **Derived columns are not authoritative:** They are written for audit and history,
//!   but on load only the raw columns are read back; the analytics crate recomputes the rest.
//! - **Lenient reads:** Unparseable date cells become absent dates, and rows whose raw
//!   numbers cannot be read are logged and left out of the records, so one bad row never
//!   blocks the file.
//! - **Lossless writes:** Unreadable rows and unparseable date text are written back as
//!   they were read. A file with rows the CSV layer could not decode is never rewritten.
//!
//! ## Public API
//!
//! - `LedgerRepository`: Loads and saves the ledger file at a configured path.
//! - `Ledger` / `LedgerEntry`: Every row of a loaded file, readable or not.
//! - `read_ledger` / `write_rows`: The same operations over any reader or writer.
//! - `LedgerRow`: The column layout of the file.
//! - `LedgerError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod entry;
pub mod error;
pub mod repository;
pub mod row;

// Re-export the key components to create a clean, public-facing API.
pub use entry::{Ledger, LedgerEntry};
pub use error::LedgerError;
pub use repository::{LedgerRepository, read_ledger, write_rows};
pub use row::LedgerRow;
