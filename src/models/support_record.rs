//! Support record model and its statutory label types.
//!
//! A [`SupportRecord`] is the single document the engine produces per
//! `(date, userId)`. Every addon and deduction field is always present with an
//! explicit label so downstream billing can rely on field presence.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AttendanceEvent, UsageStatus};

/// Label used for free-text addon fields that are not applied.
pub const NOT_APPLIED: &str = "not applied";

/// The logical key of a support record.
///
/// The document id derived from it is deterministic so that two concurrent
/// derivations of the same event collide at the store instead of producing
/// two records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordKey {
    /// The service day.
    pub date: NaiveDate,
    /// The child.
    pub user_id: String,
}

impl RecordKey {
    /// Creates a key.
    pub fn new(date: NaiveDate, user_id: impl Into<String>) -> Self {
        Self {
            date,
            user_id: user_id.into(),
        }
    }

    /// Returns the document id, `{date}_{userId}`.
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.date, self.user_id)
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.document_id())
    }
}

/// Statutory service-duration class.
///
/// # Example
///
/// ```
/// use service_record_engine::models::TimeClass;
///
/// assert_eq!(TimeClass::Class2.to_string(), "Class 2 (1h30m-3h)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeClass {
    /// 30 minutes up to and including 1h30m.
    #[serde(rename = "Class 1 (30min-1h30m)")]
    Class1,
    /// Over 1h30m up to and including 3 hours.
    #[serde(rename = "Class 2 (1h30m-3h)")]
    Class2,
    /// Over 3 hours.
    #[serde(rename = "Class 3 (3h-5h)")]
    Class3,
}

impl TimeClass {
    /// The label written onto records.
    pub fn label(self) -> &'static str {
        match self {
            TimeClass::Class1 => "Class 1 (30min-1h30m)",
            TimeClass::Class2 => "Class 2 (1h30m-3h)",
            TimeClass::Class3 => "Class 3 (3h-5h)",
        }
    }
}

impl std::fmt::Display for TimeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Extension addon tier for time beyond the base allotment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionTier {
    /// 30 minutes up to 1 hour over.
    Tier1,
    /// 1 hour up to 2 hours over.
    Tier2,
    /// 2 hours or more over.
    Tier3,
}

impl ExtensionTier {
    /// Returns the tier number (1-3).
    pub fn number(self) -> u8 {
        match self {
            ExtensionTier::Tier1 => 1,
            ExtensionTier::Tier2 => 2,
            ExtensionTier::Tier3 => 3,
        }
    }
}

/// The extended-support addon label written onto a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtendedSupportAddon {
    /// No qualifying extension.
    #[default]
    #[serde(rename = "not applied")]
    NotApplied,
    /// Tier 1.
    #[serde(rename = "Tier 1 (30min-1h)")]
    Tier1,
    /// Tier 2.
    #[serde(rename = "Tier 2 (1h-2h)")]
    Tier2,
    /// Tier 3.
    #[serde(rename = "Tier 3 (2h+)")]
    Tier3,
}

impl ExtendedSupportAddon {
    /// The label written onto records.
    pub fn label(self) -> &'static str {
        match self {
            ExtendedSupportAddon::NotApplied => NOT_APPLIED,
            ExtendedSupportAddon::Tier1 => "Tier 1 (30min-1h)",
            ExtendedSupportAddon::Tier2 => "Tier 2 (1h-2h)",
            ExtendedSupportAddon::Tier3 => "Tier 3 (2h+)",
        }
    }
}

impl From<ExtensionTier> for ExtendedSupportAddon {
    fn from(tier: ExtensionTier) -> Self {
        match tier {
            ExtensionTier::Tier1 => ExtendedSupportAddon::Tier1,
            ExtensionTier::Tier2 => ExtendedSupportAddon::Tier2,
            ExtensionTier::Tier3 => ExtendedSupportAddon::Tier3,
        }
    }
}

/// An on/off addon label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AddonFlag {
    /// The addon is billed.
    #[serde(rename = "apply")]
    Applied,
    /// The addon is not billed.
    #[default]
    #[serde(rename = "not applied")]
    NotApplied,
}

impl AddonFlag {
    /// The label written onto records.
    pub fn label(self) -> &'static str {
        match self {
            AddonFlag::Applied => "apply",
            AddonFlag::NotApplied => NOT_APPLIED,
        }
    }
}

/// A deduction label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeductionFlag {
    /// The deduction is taken.
    #[serde(rename = "deducted")]
    Deducted,
    /// No deduction.
    #[default]
    #[serde(rename = "not deducted")]
    NotDeducted,
}

/// The billing/support record derived from one attendance event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRecord {
    /// Deterministic document key, `{date}_{userId}`.
    pub document_id: String,
    /// The service day.
    pub date: NaiveDate,
    /// The child.
    pub user_id: String,
    /// The child's display name.
    pub user_name: String,
    /// The usage category of the day.
    pub status: UsageStatus,
    /// Arrival time, verbatim from the event.
    pub start_time: Option<String>,
    /// Departure time, verbatim from the event.
    pub end_time: Option<String>,
    /// Statutory planned service duration in hours.
    pub duration: Option<Decimal>,
    /// Statutory time class derived from `duration`.
    pub time_class: Option<TimeClass>,
    /// Extension time over the base allotment, in hours.
    pub extension_duration: Option<Decimal>,
    /// Extended-support addon tier.
    pub extended_support_addon: ExtendedSupportAddon,
    /// Absence addon.
    pub absence_addon: AddonFlag,
    /// Welfare specialist placement addon (facility default, free label).
    pub welfare_specialist_addon: String,
    /// Staff allocation addon (facility default, free label).
    pub staff_allocation_addon: String,
    /// Specialized support system addon (facility default).
    pub specialized_support_system_addon: AddonFlag,
    /// Specialized support (per-use) addon.
    pub specialized_support_addon: AddonFlag,
    /// Individual support addon.
    pub individual_support_addon: AddonFlag,
    /// Family support addon.
    pub family_support_addon: AddonFlag,
    /// Transport addon.
    pub transport_addon: AddonFlag,
    /// Medical care addon.
    pub medical_care_addon: AddonFlag,
    /// Agency coordination addon.
    pub agency_coordination_addon: AddonFlag,
    /// Deduction for a missing support plan.
    pub plan_missing_deduction: DeductionFlag,
    /// Deduction for a staffing shortage.
    pub staff_shortage_deduction: DeductionFlag,
    /// Deduction for a missing self-assessment.
    pub self_assessment_deduction: DeductionFlag,
    /// What support was given; the absence path fills this in.
    pub support_content: String,
    /// Free text, left blank for staff.
    pub condition_notes: String,
    /// Free text, left blank for staff.
    pub staff_notes: String,
    /// When the engine created the record.
    pub created_at: DateTime<Utc>,
}

impl SupportRecord {
    /// Creates a record for an event with every derived field at its default.
    pub fn blank(event: &AttendanceEvent, created_at: DateTime<Utc>) -> Self {
        Self {
            document_id: event.key().document_id(),
            date: event.date,
            user_id: event.user_id.clone(),
            user_name: event.user_name.clone(),
            status: event.status,
            start_time: None,
            end_time: None,
            duration: None,
            time_class: None,
            extension_duration: None,
            extended_support_addon: ExtendedSupportAddon::NotApplied,
            absence_addon: AddonFlag::NotApplied,
            welfare_specialist_addon: NOT_APPLIED.to_string(),
            staff_allocation_addon: NOT_APPLIED.to_string(),
            specialized_support_system_addon: AddonFlag::NotApplied,
            specialized_support_addon: AddonFlag::NotApplied,
            individual_support_addon: AddonFlag::NotApplied,
            family_support_addon: AddonFlag::NotApplied,
            transport_addon: AddonFlag::NotApplied,
            medical_care_addon: AddonFlag::NotApplied,
            agency_coordination_addon: AddonFlag::NotApplied,
            plan_missing_deduction: DeductionFlag::NotDeducted,
            staff_shortage_deduction: DeductionFlag::NotDeducted,
            self_assessment_deduction: DeductionFlag::NotDeducted,
            support_content: String::new(),
            condition_notes: String::new(),
            staff_notes: String::new(),
            created_at,
        }
    }

    /// Returns the record's logical key.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.date, self.user_id.clone())
    }
}
