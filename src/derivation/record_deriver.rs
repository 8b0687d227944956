//! Support record derivation.
//!
//! [`RecordDeriver`] turns one attendance event into at most one persisted
//! [`SupportRecord`]. The flow is fixed:
//!
//! 1. Idempotency check against the record store.
//! 2. Facility addon defaults.
//! 3. The absence path or the attendance path, selected by status.
//! 4. A single insert.
//!
//! Plan and addon lookups degrade to defaults when their collaborators fail.
//! Record store failures do not: a failed existence check aborts before any
//! write, and a failed insert is returned with the event attached.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::calculation::{
    classify_duration, classify_overage, compute_extension, parse_clock_time, ExtensionInfo,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AddonFlag, AttendanceEvent, AuditTrace, SupportRecord, UsageStatus};
use crate::store::{AddonMasterStore, PlanStore, RecordStore, StoreError, StoreResult};

use super::addon_defaults::{AddonDefaults, AddonDefaultsProvider};
use super::schedule_resolver::{PlannedDuration, ScheduleResolver};

/// Why a derivation wrote nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A record for the key existed before derivation started.
    AlreadyRecorded,
    /// Another derivation inserted the same key first.
    ConcurrentInsert,
}

/// The result of deriving one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DerivationOutcome {
    /// A new record was written.
    Created {
        /// The persisted record.
        record: SupportRecord,
        /// The rule decisions that produced it.
        #[serde(rename = "auditTrace")]
        audit_trace: AuditTrace,
    },
    /// Nothing was written.
    Skipped {
        /// The key that was already taken.
        #[serde(rename = "documentId")]
        document_id: String,
        /// Why nothing was written.
        reason: SkipReason,
    },
}

impl DerivationOutcome {
    /// Returns the document id the outcome refers to.
    pub fn document_id(&self) -> &str {
        match self {
            DerivationOutcome::Created { record, .. } => &record.document_id,
            DerivationOutcome::Skipped { document_id, .. } => document_id,
        }
    }

    /// Returns the created record, if any.
    pub fn record(&self) -> Option<&SupportRecord> {
        match self {
            DerivationOutcome::Created { record, .. } => Some(record),
            DerivationOutcome::Skipped { .. } => None,
        }
    }

    /// Returns true if a record was written.
    pub fn is_created(&self) -> bool {
        matches!(self, DerivationOutcome::Created { .. })
    }
}

/// Derives and persists support records from attendance events.
///
/// Holds no per-event state, so one instance can be shared across tasks.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use service_record_engine::config::EngineConfig;
/// use service_record_engine::derivation::RecordDeriver;
/// use service_record_engine::models::{AttendanceEvent, UsageStatus};
/// use service_record_engine::store::MemoryStore;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = Arc::new(MemoryStore::new());
/// let deriver = RecordDeriver::new(
///     store.clone(),
///     store.clone(),
///     store.clone(),
///     EngineConfig::default(),
/// );
///
/// let event = AttendanceEvent {
///     date: "2025-06-02".parse().unwrap(),
///     user_id: "U1".to_string(),
///     user_name: "Aoi".to_string(),
///     status: UsageStatus::AfterSchool,
///     start_time: Some("14:00".to_string()),
///     end_time: Some("17:30".to_string()),
///     extension_minutes_override: None,
///     absence_reason: None,
/// };
///
/// let outcome = deriver.derive(&event).await.unwrap();
/// assert!(outcome.is_created());
/// assert_eq!(outcome.document_id(), "2025-06-02_U1");
/// # });
/// ```
pub struct RecordDeriver {
    schedule: ScheduleResolver,
    addons: AddonDefaultsProvider,
    records: Arc<dyn RecordStore>,
    config: EngineConfig,
}

impl RecordDeriver {
    /// Creates a deriver over the three store collaborators.
    pub fn new(
        plans: Arc<dyn PlanStore>,
        addons: Arc<dyn AddonMasterStore>,
        records: Arc<dyn RecordStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            schedule: ScheduleResolver::new(plans),
            addons: AddonDefaultsProvider::new(addons, config.addon_names.clone()),
            records,
            config,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Derives the record for one event and persists it.
    ///
    /// # Returns
    ///
    /// - `Created` with the written record and its audit trace
    /// - `Skipped` if a record for `(date, userId)` already exists, or another
    ///   derivation inserted it while this one was running
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidEvent`] for an event that cannot be keyed
    /// - [`EngineError::RecordLookup`] if the existence check fails; nothing is
    ///   written
    /// - [`EngineError::PersistenceFailed`] if the insert fails; carries the
    ///   event for retry
    pub async fn derive(&self, event: &AttendanceEvent) -> EngineResult<DerivationOutcome> {
        let started = Instant::now();
        event.validate()?;

        let document_id = event.key().document_id();

        let existing = self
            .records
            .find_record(event.date, &event.user_id)
            .await
            .map_err(|source| {
                error!(
                    document_id = %document_id,
                    error = %source,
                    "Existing record check failed"
                );
                EngineError::RecordLookup {
                    date: event.date,
                    user_id: event.user_id.clone(),
                    source,
                }
            })?;

        if existing.is_some() {
            info!(document_id = %document_id, "Record already exists, skipping");
            return Ok(DerivationOutcome::Skipped {
                document_id,
                reason: SkipReason::AlreadyRecorded,
            });
        }

        let mut trace = AuditTrace::default();
        trace.record(
            "idempotency_check",
            "Existing Record Check",
            json!({ "documentId": document_id }),
            json!({ "exists": false }),
            "No record exists for this user and date",
        );

        let mut record = SupportRecord::blank(event, Utc::now());

        match event.status {
            UsageStatus::Absence => {
                let addons = self.addons.load_defaults().await;
                self.addon_defaults_or_fallback(addons, &mut trace)
                    .apply_to(&mut record);
                self.fill_absence(event, &mut record, &mut trace);
            }
            UsageStatus::AfterSchool | UsageStatus::NonSchoolDay => {
                let (addons, planned) = tokio::join!(
                    self.addons.load_defaults(),
                    self.schedule.resolve(&event.user_id, event.date),
                );
                self.addon_defaults_or_fallback(addons, &mut trace)
                    .apply_to(&mut record);
                self.fill_attendance(event, planned, &mut record, &mut trace);
            }
        }

        trace.duration_us = started.elapsed().as_micros() as u64;

        match self.records.insert_record(&record).await {
            Ok(()) => {
                info!(
                    document_id = %record.document_id,
                    status = %record.status,
                    time_class = ?record.time_class,
                    extended_support_addon = record.extended_support_addon.label(),
                    warnings = trace.warnings.len(),
                    duration_us = trace.duration_us,
                    "Support record created"
                );
                Ok(DerivationOutcome::Created {
                    record,
                    audit_trace: trace,
                })
            }
            Err(StoreError::DuplicateKey { document_id }) => {
                info!(
                    document_id = %document_id,
                    "Record inserted concurrently, skipping"
                );
                Ok(DerivationOutcome::Skipped {
                    document_id,
                    reason: SkipReason::ConcurrentInsert,
                })
            }
            Err(source) => {
                error!(
                    document_id = %record.document_id,
                    error = %source,
                    "Failed to persist support record"
                );
                Err(EngineError::PersistenceFailed {
                    event: Box::new(event.clone()),
                    source,
                })
            }
        }
    }

    /// Derives a list of events one after another.
    ///
    /// Results are returned in input order. A failure for one event does not
    /// stop the rest.
    pub async fn derive_batch(
        &self,
        events: &[AttendanceEvent],
    ) -> Vec<EngineResult<DerivationOutcome>> {
        let mut results = Vec::with_capacity(events.len());
        for event in events {
            results.push(self.derive(event).await);
        }
        results
    }

    fn addon_defaults_or_fallback(
        &self,
        loaded: StoreResult<AddonDefaults>,
        trace: &mut AuditTrace,
    ) -> AddonDefaults {
        let (defaults, source) = match loaded {
            Ok(defaults) => (defaults, "addon_master"),
            Err(err) => {
                warn!(error = %err, "Addon master lookup failed, using not applied");
                trace.warn(
                    "ADDON_LOOKUP_UNAVAILABLE",
                    format!("Addon master could not be read: {}", err),
                );
                (AddonDefaults::default(), "fallback")
            }
        };

        trace.record(
            "addon_defaults",
            "Facility Addon Defaults",
            json!({ "source": source }),
            json!(defaults),
            "Facility-scoped addon master entries applied",
        );
        defaults
    }

    fn fill_absence(
        &self,
        event: &AttendanceEvent,
        record: &mut SupportRecord,
        trace: &mut AuditTrace,
    ) {
        record.absence_addon = AddonFlag::Applied;
        record.support_content = match event.absence_reason.as_deref().map(str::trim) {
            Some(reason) if !reason.is_empty() => reason.to_string(),
            _ => self.config.absence_support_content.clone(),
        };

        trace.record(
            "absence",
            "Absence Addon",
            json!({ "absenceReason": event.absence_reason }),
            json!({
                "absenceAddon": record.absence_addon.label(),
                "supportContent": record.support_content,
            }),
            "Absence days bill the absence addon and carry no duration",
        );
    }

    fn fill_attendance(
        &self,
        event: &AttendanceEvent,
        planned: StoreResult<Option<PlannedDuration>>,
        record: &mut SupportRecord,
        trace: &mut AuditTrace,
    ) {
        record.start_time = event.start_time.clone();
        record.end_time = event.end_time.clone();

        record.duration = match planned {
            Ok(Some(planned)) => {
                trace.record(
                    "planned_duration",
                    "Planned Duration",
                    json!({ "weekdayIndex": planned.weekday_index }),
                    json!({ "hours": planned.hours.to_string(), "planId": planned.plan_id }),
                    format!(
                        "Final support plan {} schedules {} hours on weekday {}",
                        planned.plan_id, planned.hours, planned.weekday_index
                    ),
                );
                Some(planned.hours)
            }
            Ok(None) => self.fallback_duration(event, "No usable support plan entry", trace),
            Err(err) => {
                warn!(
                    user_id = %event.user_id,
                    error = %err,
                    "Support plan lookup failed, using fallback duration"
                );
                trace.warn(
                    "PLAN_LOOKUP_UNAVAILABLE",
                    format!("Support plan could not be read: {}", err),
                );
                self.fallback_duration(event, "Support plan lookup failed", trace)
            }
        };

        record.time_class = classify_duration(record.duration);
        trace.record(
            "time_class",
            "Time Class",
            json!({ "hours": record.duration.map(|d| d.to_string()) }),
            json!({ "timeClass": record.time_class.map(|c| c.label()) }),
            "Class 1 up to 1.5 hours, Class 2 up to 3 hours, Class 3 above",
        );

        self.check_clock_times(event, trace);

        let override_minutes = event.extension_override_minutes();
        if let (Some(raw), None) = (&event.extension_minutes_override, override_minutes) {
            warn!(
                user_id = %event.user_id,
                value = %raw,
                "Unusable extension override, using clock times"
            );
            trace.warn(
                "MALFORMED_EXTENSION_OVERRIDE",
                format!("extensionMinutesOverride '{}' is not a number of minutes", raw),
            );
        }

        let (extension, source) = match override_minutes {
            Some(over) => (classify_overage(event.status, over), "override"),
            None => (
                compute_extension(
                    event.status,
                    event.start_time.as_deref(),
                    event.end_time.as_deref(),
                ),
                "clock_times",
            ),
        };

        if let Some(ExtensionInfo { tier, .. }) = &extension {
            record.extended_support_addon = (*tier).into();
        }
        record.extension_duration = extension.as_ref().map(ExtensionInfo::hours);

        trace.record(
            "extension",
            "Extended Support",
            json!({
                "source": source,
                "startTime": event.start_time,
                "endTime": event.end_time,
                "overrideMinutes": override_minutes,
            }),
            json!({
                "extensionDuration": record.extension_duration.map(|d| d.to_string()),
                "extendedSupportAddon": record.extended_support_addon.label(),
            }),
            match &extension {
                Some(info) => format!("Extension of {}", info.display_label),
                None => "Less than 30 minutes over the base allotment".to_string(),
            },
        );
    }

    fn fallback_duration(
        &self,
        event: &AttendanceEvent,
        cause: &str,
        trace: &mut AuditTrace,
    ) -> Option<Decimal> {
        let hours = self.config.fallback_duration(event.status);
        debug!(
            user_id = %event.user_id,
            status = %event.status,
            hours = ?hours,
            "Using fallback planned duration"
        );
        trace.record(
            "planned_duration",
            "Planned Duration",
            json!({ "status": event.status }),
            json!({ "hours": hours.map(|h| h.to_string()), "source": "fallback" }),
            format!("{}; using the {} fallback", cause, event.status),
        );
        hours
    }

    fn check_clock_times(&self, event: &AttendanceEvent, trace: &mut AuditTrace) {
        for (field, value) in [("startTime", &event.start_time), ("endTime", &event.end_time)] {
            if let Some(text) = value {
                if parse_clock_time(text).is_none() {
                    warn!(
                        user_id = %event.user_id,
                        field = field,
                        value = %text,
                        "Malformed clock time"
                    );
                    trace.warn(
                        "MALFORMED_CLOCK_TIME",
                        format!("{} '{}' is not HH:MM", field, text),
                    );
                }
            }
        }
    }
}
