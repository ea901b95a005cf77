pub mod dates;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use dates::{parse_date, DEFAULT_DATE_FORMATS};
pub use enums::{BucketKey, Classification, DateField, Granularity, RankDirection, RecordIssue};
pub use error::CoreError;
pub use structs::{DerivedRecord, TradeRecord};
