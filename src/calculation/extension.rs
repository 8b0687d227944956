//! Extension time calculation and tiering.
//!
//! Extension time is the part of a day's attendance that runs past the
//! statutory base allotment for its usage category. Overages of 30 minutes or
//! more are billed under one of three extended-support tiers.
//!
//! ## Tier Structure
//!
//! | base allotment | after school 180 min, non-school day 300 min |
//! |---|---|
//! | under 30 min over | not billable |
//! | 30 to 59 min over | tier 1 |
//! | 60 to 119 min over | tier 2 |
//! | 120 min or more over | tier 3 |

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{ExtensionTier, UsageStatus};

/// Base allotment for after-school days, in minutes.
pub const AFTER_SCHOOL_BASE_MINUTES: i64 = 180;

/// Base allotment for non-school days, in minutes.
pub const NON_SCHOOL_DAY_BASE_MINUTES: i64 = 300;

/// Smallest billable overage, in minutes. Also the lower bound of tier 1.
pub const MIN_BILLABLE_EXTENSION_MINUTES: i64 = 30;

/// Lower bound of tier 2, in minutes.
pub const TIER_2_MIN_MINUTES: i64 = 60;

/// Lower bound of tier 3, in minutes.
pub const TIER_3_MIN_MINUTES: i64 = 120;

/// A qualifying extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionInfo {
    /// Minutes used beyond the base allotment.
    pub minutes_over_base: i64,
    /// The billing tier.
    pub tier: ExtensionTier,
    /// e.g. `"1 hour 30 minutes (tier 2)"`.
    pub display_label: String,
}

impl ExtensionInfo {
    /// Returns the overage in hours, rounded to two places and written with
    /// at least one (`"2.0"`, `"0.5"`, `"0.83"`).
    ///
    /// # Example
    ///
    /// ```
    /// use service_record_engine::calculation::classify_overage;
    /// use service_record_engine::models::UsageStatus;
    ///
    /// let info = classify_overage(UsageStatus::AfterSchool, 45).unwrap();
    /// assert_eq!(info.hours().to_string(), "0.75");
    /// ```
    pub fn hours(&self) -> Decimal {
        let mut hours = (Decimal::from(self.minutes_over_base) / Decimal::from(60))
            .round_dp(2)
            .normalize();
        if hours.scale() == 0 {
            hours.rescale(1);
        }
        hours
    }
}

/// Returns the statutory base allotment for a usage category.
///
/// Absence days have no allotment.
pub fn base_minutes(status: UsageStatus) -> Option<i64> {
    match status {
        UsageStatus::AfterSchool => Some(AFTER_SCHOOL_BASE_MINUTES),
        UsageStatus::NonSchoolDay => Some(NON_SCHOOL_DAY_BASE_MINUTES),
        UsageStatus::Absence => None,
    }
}

/// Computes the extension for a day from its arrival and departure times.
///
/// Returns `None` when there is nothing to bill:
/// - the status is [`UsageStatus::Absence`]
/// - either time is missing or not `HH:MM`
/// - departure is not after arrival
/// - the overage is under 30 minutes
///
/// # Examples
///
/// ```
/// use service_record_engine::calculation::compute_extension;
/// use service_record_engine::models::{ExtensionTier, UsageStatus};
///
/// // 3h30m after school: 30 minutes over the 3 hour base.
/// let info = compute_extension(UsageStatus::AfterSchool, Some("14:00"), Some("17:30")).unwrap();
/// assert_eq!(info.minutes_over_base, 30);
/// assert_eq!(info.tier, ExtensionTier::Tier1);
///
/// assert!(compute_extension(UsageStatus::Absence, Some("14:00"), Some("19:00")).is_none());
/// ```
pub fn compute_extension(
    status: UsageStatus,
    arrival: Option<&str>,
    departure: Option<&str>,
) -> Option<ExtensionInfo> {
    let base = base_minutes(status)?;
    let arrival = parse_clock_time(arrival?)?;
    let departure = parse_clock_time(departure?)?;

    let used_minutes = departure.signed_duration_since(arrival).num_minutes();
    if used_minutes <= 0 {
        return None;
    }

    classify_overage(status, used_minutes - base)
}

/// Tiers an overage that is already expressed in minutes over the base.
///
/// This is the tiering half of [`compute_extension`], used directly when staff
/// enter the overage by hand.
pub fn classify_overage(status: UsageStatus, over_minutes: i64) -> Option<ExtensionInfo> {
    if status.is_absence() || over_minutes < MIN_BILLABLE_EXTENSION_MINUTES {
        return None;
    }

    let tier = if over_minutes >= TIER_3_MIN_MINUTES {
        ExtensionTier::Tier3
    } else if over_minutes >= TIER_2_MIN_MINUTES {
        ExtensionTier::Tier2
    } else {
        ExtensionTier::Tier1
    };

    Some(ExtensionInfo {
        minutes_over_base: over_minutes,
        tier,
        display_label: format!("{} (tier {})", format_minutes(over_minutes), tier.number()),
    })
}

/// Parses a 24-hour `HH:MM` clock time.
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()
}

/// Renders minutes as "H hours M minutes", leaving out a zero unit.
fn format_minutes(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    let unit = |n: i64, one: &str, many: &str| format!("{} {}", n, if n == 1 { one } else { many });

    match (hours, mins) {
        (0, m) => unit(m, "minute", "minutes"),
        (h, 0) => unit(h, "hour", "hours"),
        (h, m) => format!("{} {}", unit(h, "hour", "hours"), unit(m, "minute", "minutes")),
    }
}
