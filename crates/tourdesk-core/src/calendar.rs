//! # Business Calendar
//!
//! Day boundaries for "today", per-date queries and the closing key.
//!
//! All three use the same UTC-normalized policy: a business date `d` covers
//! `[d 00:00:00Z, d+1 00:00:00Z)`. Local time is only used for display and
//! for the closing window.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::error::ValidationError;

/// Format accepted for business dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Half-open `[start, end)` bounds of a business date.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let end = date
        .checked_add_days(Days::new(1))
        .map(|next| next.and_time(chrono::NaiveTime::MIN).and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    (start, end)
}

/// Business date containing `now`.
pub fn business_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Parses a `YYYY-MM-DD` business date.
///
/// ## Example
/// ```rust
/// use tourdesk_core::calendar::parse_business_date;
///
/// assert!(parse_business_date("2024-06-01").is_ok());
/// assert!(parse_business_date("01/06/2024").is_err());
/// ```
pub fn parse_business_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("expected YYYY-MM-DD ({})", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_bounds_are_half_open_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let (start, end) = day_bounds(date);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_day_bounds_month_end() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let (_, end) = day_bounds(date);
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_business_date() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 23, 59, 59).unwrap();
        assert_eq!(business_date(now), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_parse_business_date() {
        assert_eq!(
            parse_business_date(" 2024-06-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(matches!(
            parse_business_date("2024-13-01"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
