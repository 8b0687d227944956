//! Weekday indexing for plan schedules.

use chrono::{Datelike, NaiveDate};

/// Returns the plan-schedule index of a date's weekday.
///
/// Plan schedules are keyed Monday=0 … Sunday=6. Calendar weekdays are
/// commonly numbered Sunday=0 … Saturday=6, so the two must not be mixed.
///
/// # Example
///
/// ```
/// use service_record_engine::calculation::weekday_index;
/// use chrono::NaiveDate;
///
/// // 2025-06-02 is a Monday, 2025-06-08 a Sunday.
/// assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()), 0);
/// assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap()), 6);
/// ```
pub fn weekday_index(date: NaiveDate) -> u32 {
    (date.weekday().num_days_from_sunday() + 6) % 7
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_full_week() {
        let expected = [
            ("2025-06-02", 0), // Monday
            ("2025-06-03", 1),
            ("2025-06-04", 2),
            ("2025-06-05", 3),
            ("2025-06-06", 4),
            ("2025-06-07", 5), // Saturday
            ("2025-06-08", 6), // Sunday
        ];

        for (date, index) in expected {
            assert_eq!(weekday_index(make_date(date)), index, "date {}", date);
        }
    }

    #[test]
    fn test_agrees_with_monday_based_numbering() {
        let mut date = make_date("2024-12-30");
        for _ in 0..21 {
            assert_eq!(weekday_index(date), date.weekday().num_days_from_monday());
            date = date.succ_opt().unwrap();
        }
    }
}
