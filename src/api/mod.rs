//! HTTP API module for the Service Record Engine.
//!
//! This module provides the REST API endpoints for deriving support records
//! from attendance events.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::BatchRequest;
pub use response::{ApiError, ApiErrorResponse, BatchItem, BatchItemOutcome, BatchResponse};
pub use state::AppState;
