//! Statutory time-class classification.
//!
//! This module maps a planned service duration in hours onto one of the three
//! statutory time classes used for subsidy billing.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::TimeClass;

/// Upper bound (inclusive) of Class 1, in hours.
pub const CLASS_1_MAX_HOURS: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Upper bound (inclusive) of Class 2, in hours.
pub const CLASS_2_MAX_HOURS: Decimal = Decimal::from_parts(30, 0, 0, false, 1);

/// Classifies a service duration.
///
/// Returns `None` when no duration is available, so that no class is assigned.
///
/// - `duration ≤ 1.5` → [`TimeClass::Class1`]
/// - `1.5 < duration ≤ 3.0` → [`TimeClass::Class2`]
/// - `duration > 3.0` → [`TimeClass::Class3`]
///
/// # Examples
///
/// ```
/// use service_record_engine::calculation::classify_duration;
/// use service_record_engine::models::TimeClass;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(classify_duration(Some(Decimal::from_str("1.5").unwrap())), Some(TimeClass::Class1));
/// assert_eq!(classify_duration(Some(Decimal::from_str("2.0").unwrap())), Some(TimeClass::Class2));
/// assert_eq!(classify_duration(Some(Decimal::from_str("3.5").unwrap())), Some(TimeClass::Class3));
/// assert_eq!(classify_duration(None), None);
/// ```
pub fn classify_duration(duration_hours: Option<Decimal>) -> Option<TimeClass> {
    let hours = duration_hours?;
    Some(if hours <= CLASS_1_MAX_HOURS {
        TimeClass::Class1
    } else if hours <= CLASS_2_MAX_HOURS {
        TimeClass::Class2
    } else {
        TimeClass::Class3
    })
}

/// Parses an hours value as stored in documents (`"2"`, `"2.5"`, `" 3.0 "`).
///
/// Returns `None` for anything that is not a plain decimal number.
pub fn parse_hours(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}
