//! Core data models for the Service Record Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod addon_master;
mod attendance_event;
mod audit;
mod support_plan;
mod support_record;

pub use addon_master::{AddonMasterEntry, AddonTarget};
pub use attendance_event::{AttendanceEvent, UsageStatus};
pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use support_plan::{PlanStatus, ScheduleSlot, SupportPlan};
pub use support_record::{
    AddonFlag, DeductionFlag, ExtendedSupportAddon, ExtensionTier, NOT_APPLIED, RecordKey,
    SupportRecord, TimeClass,
};
