use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Booking state of a lot, derived from its quantities and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Open,
    PartiallyBooked,
    FullyBooked,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Open => "Open",
            Classification::PartiallyBooked => "Partially Booked",
            Classification::FullyBooked => "Fully Booked",
        };
        f.write_str(label)
    }
}

/// The width of a reporting period.
///
/// Settings files go through `FromStr`, so the short forms `m`, `q` and `y`
/// are accepted there as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Granularity {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    /// Truncates a date to the period that contains it.
    pub fn truncate(&self, date: NaiveDate) -> BucketKey {
        let year = date.year();
        match self {
            Granularity::Monthly => BucketKey::Month {
                year,
                month: date.month(),
            },
            Granularity::Quarterly => BucketKey::Quarter {
                year,
                quarter: date.month0() / 3 + 1,
            },
            Granularity::Yearly => BucketKey::Year { year },
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
            Granularity::Yearly => "yearly",
        };
        f.write_str(label)
    }
}

impl FromStr for Granularity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Granularity::Monthly),
            "quarterly" | "quarter" | "q" => Ok(Granularity::Quarterly),
            "yearly" | "year" | "y" => Ok(Granularity::Yearly),
            other => Err(CoreError::InvalidInput(
                "granularity".to_string(),
                other.to_string(),
            )),
        }
    }
}

impl TryFrom<String> for Granularity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single reporting period.
///
/// Keys produced by the same `Granularity` order chronologically. Keys of
/// different granularities are never mixed within one aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Month { year: i32, month: u32 },
    Quarter { year: i32, quarter: u32 },
    Year { year: i32 },
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            BucketKey::Quarter { year, quarter } => write!(f, "{year:04}Q{quarter}"),
            BucketKey::Year { year } => write!(f, "{year:04}"),
        }
    }
}

impl Serialize for BucketKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which of a record's two dates drives a time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    /// Activity and open-position views.
    Entry,
    /// Realized P/L views.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDirection {
    /// Largest key first.
    Max,
    /// Smallest key first.
    Min,
}

/// A recoverable anomaly on a derived record. Values are never corrected,
/// only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordIssue {
    /// `entry_price <= 0`; the return percentage is reported as zero.
    NonPositiveEntryPrice,
    /// `remaining_quantity` outside `0..=entry_quantity`, or a negative entry quantity.
    QuantityOutOfRange,
    /// The exit date precedes the entry date.
    NegativeHoldingPeriod,
    /// An exit price without an exit date.
    MissingExitDate,
    /// A derived amount fell outside `Decimal` range and is reported as zero.
    ArithmeticOverflow,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordIssue::NonPositiveEntryPrice => "entry price is not positive",
            RecordIssue::QuantityOutOfRange => "remaining quantity outside 0..=entry quantity",
            RecordIssue::NegativeHoldingPeriod => "exit date precedes entry date",
            RecordIssue::MissingExitDate => "exit price recorded without an exit date",
            RecordIssue::ArithmeticOverflow => "derived amount out of range, reported as 0",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_truncate_per_granularity() {
        let d = date(2024, 8, 17);
        assert_eq!(
            Granularity::Monthly.truncate(d),
            BucketKey::Month { year: 2024, month: 8 }
        );
        assert_eq!(
            Granularity::Quarterly.truncate(d),
            BucketKey::Quarter { year: 2024, quarter: 3 }
        );
        assert_eq!(Granularity::Yearly.truncate(d), BucketKey::Year { year: 2024 });
    }

    #[test]
    fn test_quarter_boundaries() {
        let q = |m| Granularity::Quarterly.truncate(date(2023, m, 1));
        assert_eq!(q(3), BucketKey::Quarter { year: 2023, quarter: 1 });
        assert_eq!(q(4), BucketKey::Quarter { year: 2023, quarter: 2 });
        assert_eq!(q(12), BucketKey::Quarter { year: 2023, quarter: 4 });
    }

    #[test]
    fn test_bucket_keys_order_chronologically() {
        let mut keys = vec![
            Granularity::Monthly.truncate(date(2024, 1, 5)),
            Granularity::Monthly.truncate(date(2023, 12, 31)),
            Granularity::Monthly.truncate(date(2023, 2, 1)),
        ];
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, vec!["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn test_bucket_key_labels() {
        assert_eq!(BucketKey::Quarter { year: 2024, quarter: 1 }.to_string(), "2024Q1");
        assert_eq!(BucketKey::Year { year: 2024 }.to_string(), "2024");
    }

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("Quarterly".parse::<Granularity>().unwrap(), Granularity::Quarterly);
        assert_eq!("y".parse::<Granularity>().unwrap(), Granularity::Yearly);
        assert!("weekly".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_granularity_from_settings_text() {
        assert_eq!(Granularity::try_from("Q".to_string()).unwrap(), Granularity::Quarterly);
        assert_eq!(Granularity::try_from(" monthly ".to_string()).unwrap(), Granularity::Monthly);
        assert!(Granularity::try_from("fortnightly".to_string()).is_err());
    }
}
