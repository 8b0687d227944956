//! Support plan model.
//!
//! Plans are owned by another part of the application; the engine only reads
//! the weekly standard schedule of the user's current Final plan.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::calculation::parse_hours;

/// Whether a plan is still being drafted or is the authoritative version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanStatus {
    /// Work in progress; never used for derivation.
    #[serde(alias = "draft")]
    Draft,
    /// The authoritative plan in effect for the user.
    #[serde(alias = "final")]
    Final,
}

/// One weekday entry of a plan's standard schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// Planned arrival time.
    #[serde(default)]
    pub start: Option<String>,
    /// Planned departure time.
    #[serde(default)]
    pub end: Option<String>,
    /// Planned service duration in hours, as stored.
    ///
    /// Stores hold this as either a string or a number; both are normalized
    /// to text here and parsed on use.
    #[serde(default, deserialize_with = "text_or_number")]
    pub duration: Option<String>,
}

impl ScheduleSlot {
    /// Returns the planned duration in hours, if present and parseable.
    pub fn planned_hours(&self) -> Option<Decimal> {
        self.duration.as_deref().and_then(parse_hours)
    }
}

/// An individualized support plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportPlan {
    /// Document identifier of the plan.
    pub id: String,
    /// The child this plan belongs to.
    pub user_id: String,
    /// Draft or Final.
    pub status: PlanStatus,
    /// When the plan was created; the newest Final plan wins.
    pub created_at: DateTime<Utc>,
    /// Weekly schedule keyed by weekday index (Monday=0 … Sunday=6).
    #[serde(default)]
    pub standard_schedule: BTreeMap<u32, ScheduleSlot>,
}

impl SupportPlan {
    /// Returns true if this plan is authoritative.
    pub fn is_final(&self) -> bool {
        self.status == PlanStatus::Final
    }

    /// Returns the schedule entry for a weekday index.
    pub fn slot_for(&self, weekday_index: u32) -> Option<&ScheduleSlot> {
        self.standard_schedule.get(&weekday_index)
    }
}

/// Accepts a JSON string or number as text; anything else reads as absent.
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
