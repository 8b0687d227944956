//! Attendance event model and usage status.
//!
//! This module defines the [`AttendanceEvent`] struct that feeds the derivation
//! engine and the [`UsageStatus`] enum that selects its absence or attendance path.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::support_plan::text_or_number;
use super::RecordKey;

/// The usage category of a service day.
///
/// Incoming documents spell statuses in either PascalCase or snake_case; both
/// are accepted here and anything else is rejected at deserialization.
///
/// # Example
///
/// ```
/// use service_record_engine::models::UsageStatus;
///
/// let status: UsageStatus = serde_json::from_str("\"non_school_day\"").unwrap();
/// assert_eq!(status, UsageStatus::NonSchoolDay);
/// assert!(serde_json::from_str::<UsageStatus>("\"Holiday\"").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageStatus {
    /// Attendance after the school day ends.
    #[serde(alias = "after_school")]
    AfterSchool,
    /// Attendance on a school holiday or other non-school day.
    #[serde(alias = "non_school_day")]
    NonSchoolDay,
    /// The child was scheduled but did not attend.
    #[serde(alias = "absence")]
    Absence,
}

impl UsageStatus {
    /// Returns true for the absence path.
    pub fn is_absence(self) -> bool {
        self == UsageStatus::Absence
    }
}

impl std::fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageStatus::AfterSchool => write!(f, "AfterSchool"),
            UsageStatus::NonSchoolDay => write!(f, "NonSchoolDay"),
            UsageStatus::Absence => write!(f, "Absence"),
        }
    }
}

/// A single attendance event: one child, one calendar day.
///
/// Clock times are kept as submitted; they are copied verbatim onto the record
/// and only parsed when extension time is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEvent {
    /// The service day.
    pub date: NaiveDate,
    /// The child's identifier.
    pub user_id: String,
    /// The child's display name, copied onto the record.
    pub user_name: String,
    /// Which derivation path applies.
    pub status: UsageStatus,
    /// Arrival time as `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// Departure time as `HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Extension minutes over the base allotment, entered by staff.
    ///
    /// Kept as entered. Any JSON number or numeric text is accepted; see
    /// [`AttendanceEvent::extension_override_minutes`].
    #[serde(
        default,
        deserialize_with = "text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub extension_minutes_override: Option<String>,
    /// Reason given for an absence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absence_reason: Option<String>,
}

impl AttendanceEvent {
    /// Returns the logical key of the record this event derives.
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.date, self.user_id.clone())
    }

    /// Returns the extension override floored to whole minutes.
    ///
    /// `None` when no override was given or it is not a number.
    pub fn extension_override_minutes(&self) -> Option<i64> {
        let raw = self.extension_minutes_override.as_deref()?.trim();
        Decimal::from_str(raw).ok()?.floor().to_i64()
    }

    /// Rejects events that cannot be keyed.
    ///
    /// Everything else about an event is recoverable by a default, so this is
    /// the only validation performed before derivation.
    pub fn validate(&self) -> EngineResult<()> {
        if self.user_id.trim().is_empty() {
            return Err(EngineError::InvalidEvent {
                field: "userId".to_string(),
                message: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_attendance_event() {
        let json = r#"{
            "date": "2025-06-02",
            "userId": "U1",
            "userName": "Aoi",
            "status": "AfterSchool",
            "startTime": "14:00",
            "endTime": "17:30"
        }"#;

        let event: AttendanceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert_eq!(event.user_id, "U1");
        assert_eq!(event.status, UsageStatus::AfterSchool);
        assert_eq!(event.start_time.as_deref(), Some("14:00"));
        assert_eq!(event.end_time.as_deref(), Some("17:30"));
        assert_eq!(event.extension_minutes_override, None);
        assert_eq!(event.absence_reason, None);
    }

    #[test]
    fn test_deserialize_absence_event_with_reason() {
        let json = r#"{
            "date": "2025-06-03",
            "userId": "U2",
            "userName": "Ren",
            "status": "absence",
            "absenceReason": "fever"
        }"#;

        let event: AttendanceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.status, UsageStatus::Absence);
        assert_eq!(event.absence_reason.as_deref(), Some("fever"));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{
            "date": "2025-06-03",
            "userId": "U2",
            "userName": "Ren",
            "status": "Holiday"
        }"#;

        let result: Result<AttendanceEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown variant"));
    }

    #[test]
    fn test_status_aliases() {
        for (raw, expected) in [
            ("\"after_school\"", UsageStatus::AfterSchool),
            ("\"NonSchoolDay\"", UsageStatus::NonSchoolDay),
            ("\"Absence\"", UsageStatus::Absence),
        ] {
            let status: UsageStatus = serde_json::from_str(raw).unwrap();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_serialize_omits_absent_optionals() {
        let event = AttendanceEvent {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            user_id: "U1".to_string(),
            user_name: "Aoi".to_string(),
            status: UsageStatus::Absence,
            start_time: None,
            end_time: None,
            extension_minutes_override: None,
            absence_reason: None,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"userId\":\"U1\""));
        assert!(!json.contains("startTime"));
        assert!(!json.contains("absenceReason"));
    }

    #[test]
    fn test_key_uses_date_and_user() {
        let event: AttendanceEvent = serde_json::from_str(
            r#"{"date":"2025-06-02","userId":"U1","userName":"Aoi","status":"AfterSchool"}"#,
        )
        .unwrap();
        assert_eq!(event.key().document_id(), "2025-06-02_U1");
    }

    #[test]
    fn test_blank_user_id_fails_validation() {
        let event: AttendanceEvent = serde_json::from_str(
            r#"{"date":"2025-06-02","userId":"  ","userName":"Aoi","status":"AfterSchool"}"#,
        )
        .unwrap();

        match event.validate() {
            Err(EngineError::InvalidEvent { field, .. }) => assert_eq!(field, "userId"),
            other => panic!("Expected InvalidEvent, got {:?}", other),
        }
    }

    #[test]
    fn test_is_absence() {
        assert!(UsageStatus::Absence.is_absence());
        assert!(!UsageStatus::AfterSchool.is_absence());
        assert!(!UsageStatus::NonSchoolDay.is_absence());
    }

    fn with_override(raw: &str) -> AttendanceEvent {
        let json = format!(
            r#"{{"date":"2025-06-02","userId":"U1","userName":"Aoi","status":"AfterSchool",
                "extensionMinutesOverride":{}}}"#,
            raw
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_extension_override_accepts_any_json_number() {
        assert_eq!(with_override("45").extension_override_minutes(), Some(45));
        assert_eq!(with_override("45.0").extension_override_minutes(), Some(45));
        assert_eq!(with_override("75.0").extension_override_minutes(), Some(75));
        assert_eq!(with_override(r#""75""#).extension_override_minutes(), Some(75));
    }

    #[test]
    fn test_fractional_extension_override_is_floored() {
        assert_eq!(with_override("45.5").extension_override_minutes(), Some(45));
        assert_eq!(with_override("29.99").extension_override_minutes(), Some(29));
    }

    #[test]
    fn test_unusable_extension_override_reads_as_absent() {
        let event = with_override(r#""abc""#);
        assert_eq!(event.extension_minutes_override.as_deref(), Some("abc"));
        assert_eq!(event.extension_override_minutes(), None);

        let event = with_override("null");
        assert_eq!(event.extension_minutes_override, None);
        assert_eq!(event.extension_override_minutes(), None);
    }
}
