//! Request types for the Service Record Engine API.
//!
//! `POST /records` takes a bare [`AttendanceEvent`]; only the batch endpoint
//! needs a wrapper.

use serde::{Deserialize, Serialize};

use crate::models::AttendanceEvent;

/// Request body for the `/records/batch` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Events to derive, in the order they should be processed.
    pub events: Vec<AttendanceEvent>,
}
