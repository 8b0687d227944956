//! Configuration types for record derivation.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from `engine.yaml`. Every field has a statutory default so a
//! partial file only overrides what it names.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::UsageStatus;

/// Planned durations used when a user has no Final plan entry for the day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FallbackDurations {
    /// Hours assumed for an after-school day.
    pub after_school: Decimal,
    /// Hours assumed for a non-school day.
    pub non_school_day: Decimal,
}

impl Default for FallbackDurations {
    fn default() -> Self {
        Self {
            after_school: Decimal::new(20, 1),
            non_school_day: Decimal::new(35, 1),
        }
    }
}

/// Addon master names that feed facility-wide record defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddonNames {
    /// Name of the welfare specialist placement addon.
    pub welfare_specialist: String,
    /// Name of the staff allocation addon.
    pub staff_allocation: String,
    /// Name of the specialized support system addon.
    pub specialized_support_system: String,
}

impl Default for AddonNames {
    fn default() -> Self {
        Self {
            welfare_specialist: "welfare_specialist_addon".to_string(),
            staff_allocation: "staff_allocation_addon".to_string(),
            specialized_support_system: "specialized_support_system_addon".to_string(),
        }
    }
}

/// The complete derivation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Planned durations used when no plan applies.
    pub fallback_durations: FallbackDurations,
    /// Support content written on absence records without a reason.
    pub absence_support_content: String,
    /// Addon master names for facility defaults.
    pub addon_names: AddonNames,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_durations: FallbackDurations::default(),
            absence_support_content: "Absent".to_string(),
            addon_names: AddonNames::default(),
        }
    }
}

impl EngineConfig {
    /// Returns the fallback planned duration for a usage category.
    ///
    /// Absence days have no duration.
    pub fn fallback_duration(&self, status: UsageStatus) -> Option<Decimal> {
        match status {
            UsageStatus::AfterSchool => Some(self.fallback_durations.after_school),
            UsageStatus::NonSchoolDay => Some(self.fallback_durations.non_school_day),
            UsageStatus::Absence => None,
        }
    }
}
