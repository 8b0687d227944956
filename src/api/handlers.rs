//! HTTP request handlers for the Service Record Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::derivation::DerivationOutcome;
use crate::models::AttendanceEvent;

use super::request::BatchRequest;
use super::response::{ApiError, ApiErrorResponse, BatchItem, BatchItemOutcome, BatchResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/records", post(create_record_handler))
        .route("/records/batch", post(create_batch_handler))
        .with_state(state)
}

/// Handler for POST /records endpoint.
///
/// Derives and persists the record for one attendance event. Returns
/// `201 Created` for a new record and `200 OK` when the event was skipped.
async fn create_record_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceEvent>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing record request");

    let event = match payload {
        Ok(Json(event)) => event,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match state.deriver().derive(&event).await {
        Ok(outcome) => {
            let status = if outcome.is_created() {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            info!(
                correlation_id = %correlation_id,
                document_id = %outcome.document_id(),
                created = outcome.is_created(),
                "Record request completed"
            );
            json_response(status, &outcome)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                user_id = %event.user_id,
                date = %event.date,
                error = %err,
                "Record derivation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, &api_error.error)
        }
    }
}

/// Handler for POST /records/batch endpoint.
///
/// Derives each event in order and reports one item per event. Failures are
/// reported per item; the batch itself always answers `200 OK` once the body
/// parses.
async fn create_batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        events_count = request.events.len(),
        "Processing batch request"
    );

    let results = state.deriver().derive_batch(&request.events).await;

    let items: Vec<BatchItem> = request
        .events
        .iter()
        .zip(results)
        .enumerate()
        .map(|(index, (event, result))| match result {
            Ok(DerivationOutcome::Created { record, .. }) => BatchItem {
                index,
                outcome: BatchItemOutcome::Created,
                document_id: record.document_id,
                reason: None,
                error: None,
            },
            Ok(DerivationOutcome::Skipped {
                document_id,
                reason,
            }) => BatchItem {
                index,
                outcome: BatchItemOutcome::Skipped,
                document_id,
                reason: Some(reason),
                error: None,
            },
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    index = index,
                    error = %err,
                    "Batch event failed"
                );
                let api_error: ApiErrorResponse = err.into();
                BatchItem {
                    index,
                    outcome: BatchItemOutcome::Failed,
                    document_id: event.key().document_id(),
                    reason: None,
                    error: Some(api_error.error),
                }
            }
        })
        .collect();

    let response = BatchResponse::new(items);
    info!(
        correlation_id = %correlation_id,
        created = response.created,
        skipped = response.skipped,
        failed = response.failed,
        "Batch request completed"
    );
    json_response(StatusCode::OK, &response)
}

/// Maps a JSON extraction failure onto a `400` response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Well-formed JSON with a missing field or an unknown status.
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
