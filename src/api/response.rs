//! Response types for the Service Record Engine API.
//!
//! This module defines the error response structures, the batch response,
//! and the mapping from [`EngineError`] onto HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::derivation::SkipReason;
use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidEvent { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid attendance event field '{}': {}", field, message),
                    "The attendance event cannot be keyed",
                ),
            },
            EngineError::RecordLookup {
                date,
                user_id,
                source,
            } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "RECORD_LOOKUP_FAILED",
                    format!(
                        "Could not check for an existing record for user '{}' on {}",
                        user_id, date
                    ),
                    source.to_string(),
                ),
            },
            EngineError::PersistenceFailed { event, source } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "PERSISTENCE_FAILED",
                    format!("{}", source),
                    // The event goes back to the caller for retry.
                    serde_json::to_string(&event).unwrap_or_default(),
                ),
            },
        }
    }
}

/// Per-event outcome in a batch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemOutcome {
    /// A record was written.
    Created,
    /// A record already existed.
    Skipped,
    /// The event could not be derived or persisted.
    Failed,
}

/// One entry of a batch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    /// Position of the event in the request.
    pub index: usize,
    /// What happened to the event.
    pub outcome: BatchItemOutcome,
    /// The record key the event maps to.
    pub document_id: String,
    /// Why nothing was written, for skipped events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
    /// The failure, for failed events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Response body for the `/records/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResponse {
    /// One item per event, in request order.
    pub items: Vec<BatchItem>,
    /// Number of records written.
    pub created: usize,
    /// Number of events skipped.
    pub skipped: usize,
    /// Number of events that failed.
    pub failed: usize,
}

impl BatchResponse {
    /// Builds a response, counting outcomes.
    pub fn new(items: Vec<BatchItem>) -> Self {
        let count = |outcome: BatchItemOutcome| items.iter().filter(|i| i.outcome == outcome).count();
        let created = count(BatchItemOutcome::Created);
        let skipped = count(BatchItemOutcome::Skipped);
        let failed = count(BatchItemOutcome::Failed);
        Self {
            items,
            created,
            skipped,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{AttendanceEvent, UsageStatus};
    use chrono::NaiveDate;

    fn sample_event() -> AttendanceEvent {
        AttendanceEvent {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            user_id: "U1".to_string(),
            user_name: "Aoi".to_string(),
            status: UsageStatus::AfterSchool,
            start_time: Some("14:00".to_string()),
            end_time: Some("17:30".to_string()),
            extension_minutes_override: None,
            absence_reason: None,
        }
    }

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_invalid_event_is_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidEvent {
            field: "userId".to_string(),
            message: "must not be blank".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "VALIDATION_ERROR");
        assert!(api_error.error.message.contains("userId"));
    }

    #[test]
    fn test_record_lookup_is_server_error() {
        let api_error: ApiErrorResponse = EngineError::RecordLookup {
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            user_id: "U1".to_string(),
            source: StoreError::Unavailable("timeout".to_string()),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "RECORD_LOOKUP_FAILED");
        assert_eq!(
            api_error.error.details.as_deref(),
            Some("store unavailable: timeout")
        );
    }

    #[test]
    fn test_persistence_failure_returns_event() {
        let api_error: ApiErrorResponse = EngineError::PersistenceFailed {
            event: Box::new(sample_event()),
            source: StoreError::Unavailable("disk full".to_string()),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "PERSISTENCE_FAILED");

        let details = api_error.error.details.unwrap();
        let event: AttendanceEvent = serde_json::from_str(&details).unwrap();
        assert_eq!(event, sample_event());
    }

    #[test]
    fn test_batch_response_counts() {
        let item = |index, outcome| BatchItem {
            index,
            outcome,
            document_id: format!("2025-06-0{}_U1", index + 1),
            reason: None,
            error: None,
        };
        let response = BatchResponse::new(vec![
            item(0, BatchItemOutcome::Created),
            item(1, BatchItemOutcome::Skipped),
            item(2, BatchItemOutcome::Created),
            item(3, BatchItemOutcome::Failed),
        ]);
        assert_eq!(response.created, 2);
        assert_eq!(response.skipped, 1);
        assert_eq!(response.failed, 1);
    }

    #[test]
    fn test_batch_item_serialization() {
        let item = BatchItem {
            index: 0,
            outcome: BatchItemOutcome::Skipped,
            document_id: "2025-06-02_U1".to_string(),
            reason: Some(SkipReason::AlreadyRecorded),
            error: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["outcome"], "skipped");
        assert_eq!(value["documentId"], "2025-06-02_U1");
        assert_eq!(value["reason"], "already_recorded");
        assert!(value.get("error").is_none());
    }
}
