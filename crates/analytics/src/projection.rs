use crate::error::AnalyticsError;
use rust_decimal::Decimal;
use serde::Serialize;

/// Projected capital at the start of a year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    /// Zero-based; year 0 holds the initial amount.
    pub year: u32,
    pub amount: Decimal,
}

/// The longest horizon `project_growth` accepts.
pub const MAX_PROJECTION_YEARS: u32 = 100;

/// Compounds `initial` annually at `annual_return_pct` for `years` points.
pub fn project_growth(
    initial: Decimal,
    annual_return_pct: Decimal,
    years: u32,
) -> Result<Vec<ProjectionPoint>, AnalyticsError> {
    if initial.is_sign_negative() {
        return Err(AnalyticsError::InvalidParameter(
            "initial".to_string(),
            format!("must not be negative, got {initial}"),
        ));
    }
    if annual_return_pct.is_sign_negative() {
        return Err(AnalyticsError::InvalidParameter(
            "annual_return_pct".to_string(),
            format!("must not be negative, got {annual_return_pct}"),
        ));
    }
    if years == 0 || years > MAX_PROJECTION_YEARS {
        return Err(AnalyticsError::InvalidParameter(
            "years".to_string(),
            format!("must be between 1 and {MAX_PROJECTION_YEARS}, got {years}"),
        ));
    }

    let growth = Decimal::ONE + annual_return_pct / Decimal::ONE_HUNDRED;
    let mut amount = initial;
    let mut points = Vec::with_capacity(years as usize);
    points.push(ProjectionPoint { year: 0, amount });

    for year in 1..years {
        amount = amount
            .checked_mul(growth)
            .ok_or(AnalyticsError::Overflow(year))?;
        points.push(ProjectionPoint { year, amount });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compounds_from_year_zero() {
        let points = project_growth(dec!(1000000), dec!(20), 3).unwrap();
        let amounts: Vec<Decimal> = points.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![dec!(1000000), dec!(1200000), dec!(1440000)]);
        assert_eq!(points[2].year, 2);
    }

    #[test]
    fn test_zero_rate_is_flat() {
        let points = project_growth(dec!(500), Decimal::ZERO, 4).unwrap();
        assert!(points.iter().all(|p| p.amount == dec!(500)));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(project_growth(dec!(-1), dec!(10), 5).is_err());
        assert!(project_growth(dec!(100), dec!(-10), 5).is_err());
        assert!(project_growth(dec!(100), dec!(10), 0).is_err());
        assert!(project_growth(dec!(100), dec!(10), MAX_PROJECTION_YEARS + 1).is_err());
        assert_eq!(project_growth(dec!(100), dec!(10), MAX_PROJECTION_YEARS).unwrap().len(), 100);
    }

    #[test]
    fn test_out_of_range_growth_is_an_error() {
        let result = project_growth(dec!(1000000), dec!(100), 90);
        assert!(matches!(result, Err(AnalyticsError::Overflow(year)) if year > 60));
    }
}
