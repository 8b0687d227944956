//! Record derivation.
//!
//! This module ties the pure classification functions in
//! [`crate::calculation`] to the store collaborators:
//!
//! - [`ScheduleResolver`]: planned duration from the newest Final support plan
//! - [`AddonDefaultsProvider`]: facility-wide addon defaults
//! - [`RecordDeriver`]: the full event-to-record flow

mod addon_defaults;
mod record_deriver;
mod schedule_resolver;

pub use addon_defaults::{AddonDefaults, AddonDefaultsProvider, coerce_specialized_system};
pub use record_deriver::{DerivationOutcome, RecordDeriver, SkipReason};
pub use schedule_resolver::{PlannedDuration, ScheduleResolver};
