//! Document-store collaborators.
//!
//! The engine never talks to a database directly. It depends on three narrow
//! traits, one per external collaborator, so each can be backed by a real
//! document store in production and by [`MemoryStore`] in tests.
//!
//! Every method returns a [`StoreResult`]; deciding whether a failure degrades
//! to a default or aborts the derivation is left to the caller.

mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use crate::error::StoreError;
use crate::models::{AddonMasterEntry, SupportPlan, SupportRecord};

pub use memory::{Collaborator, MemoryStore, SeedData};

/// A type alias for Results returned by store collaborators.
pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to support plans.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Returns the user's Final plans, most recently created first.
    async fn find_final_plans(&self, user_id: &str) -> StoreResult<Vec<SupportPlan>>;
}

/// Read access to the addon master.
#[async_trait]
pub trait AddonMasterStore: Send + Sync {
    /// Returns the facility-scoped addon master entries.
    async fn list_facility_addons(&self) -> StoreResult<Vec<AddonMasterEntry>>;
}

/// Support record persistence.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the record for `(date, user_id)`, if one exists.
    async fn find_record(&self, date: NaiveDate, user_id: &str)
    -> StoreResult<Option<SupportRecord>>;

    /// Writes a new record under its document id.
    ///
    /// Must fail with [`StoreError::DuplicateKey`] rather than overwrite when
    /// the document id is already taken.
    async fn insert_record(&self, record: &SupportRecord) -> StoreResult<()>;
}
