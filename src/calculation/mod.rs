//! Pure classification logic for the Service Record Engine.
//!
//! This module contains the side-effect-free rules: statutory time-class
//! classification of a planned duration, extension time computation and
//! tiering, and weekday indexing for plan schedules.

mod duration_class;
mod extension;
mod weekday;

pub use duration_class::{CLASS_1_MAX_HOURS, CLASS_2_MAX_HOURS, classify_duration, parse_hours};
pub use extension::{
    AFTER_SCHOOL_BASE_MINUTES, ExtensionInfo, MIN_BILLABLE_EXTENSION_MINUTES,
    NON_SCHOOL_DAY_BASE_MINUTES, TIER_2_MIN_MINUTES, TIER_3_MIN_MINUTES, base_minutes,
    classify_overage, compute_extension, parse_clock_time,
};
pub use weekday::weekday_index;
