// dates.rs - Decimal-year handling for tip dates

use chrono::{Datelike, NaiveDate};
use crate::phylo::TreeError;

/// Parse a tip date given either as a decimal year (`2023.923288`) or as an
/// ISO calendar date (`2023-12-04`)
pub fn parse_tip_date(value: &str) -> Result<f64, TreeError> {
    let value = value.trim();
    if let Ok(year) = value.parse::<f64>() {
        if year.is_finite() {
            return Ok(year);
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| TreeError::InvalidDate(value.to_string()))?;
    decimal_year(date).ok_or_else(|| TreeError::InvalidDate(value.to_string()))
}

/// `year + days elapsed since 1 January / days in year`
pub fn decimal_year(date: NaiveDate) -> Option<f64> {
    let start = NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
    let next = NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)?;
    let days_in_year = (next - start).num_days() as f64;
    Some(date.year() as f64 + date.ordinal0() as f64 / days_in_year)
}
