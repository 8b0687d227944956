//! Error types for the Service Record Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! [`EngineError`] covers everything a caller of the engine can observe;
//! [`StoreError`] is what the document-store collaborators report at their
//! boundary before the engine decides whether to degrade or fail.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::AttendanceEvent;

/// The main error type for the Service Record Engine.
///
/// Lookup failures against the plan and addon collaborators never surface
/// here: the engine resolves them to defaults. Only configuration problems,
/// malformed events and record-store failures are reported.
///
/// # Example
///
/// ```
/// use service_record_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An attendance event was rejected before derivation started.
    #[error("Invalid attendance event field '{field}': {message}")]
    InvalidEvent {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The idempotency check against the record store could not be performed.
    #[error("Could not check for an existing record for user '{user_id}' on {date}: {source}")]
    RecordLookup {
        /// The event date.
        date: NaiveDate,
        /// The event user.
        user_id: String,
        /// The store failure.
        source: StoreError,
    },

    /// The assembled record could not be written.
    ///
    /// Carries the original event so the caller can queue or retry it.
    #[error("Failed to persist record for user '{}' on {}: {source}", .event.user_id, .event.date)]
    PersistenceFailed {
        /// The event whose record was not written.
        event: Box<AttendanceEvent>,
        /// The store failure.
        source: StoreError,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures reported by a document-store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An insert was rejected because the document key is already taken.
    #[error("document '{document_id}' already exists")]
    DuplicateKey {
        /// The conflicting document key.
        document_id: String,
    },

    /// A stored document could not be mapped onto the engine's types.
    #[error("corrupt document: {0}")]
    Corrupt(String),
}
