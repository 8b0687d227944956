//! Facility-wide addon defaults.
//!
//! Three addon fields on every record come from the addon master rather than
//! from the event: welfare specialist placement, staff allocation, and the
//! specialized support system. Everything else starts at its "not applied"
//! label.

use std::sync::Arc;

use serde::Serialize;

use crate::config::AddonNames;
use crate::models::{AddonFlag, AddonMasterEntry, NOT_APPLIED, SupportRecord};
use crate::store::{AddonMasterStore, StoreResult};

/// The facility defaults written onto a record before branching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonDefaults {
    /// Welfare specialist placement label, verbatim from the master.
    pub welfare_specialist: String,
    /// Staff allocation label, verbatim from the master.
    pub staff_allocation: String,
    /// Specialized support system flag.
    pub specialized_support_system: AddonFlag,
}

impl Default for AddonDefaults {
    fn default() -> Self {
        Self {
            welfare_specialist: NOT_APPLIED.to_string(),
            staff_allocation: NOT_APPLIED.to_string(),
            specialized_support_system: AddonFlag::NotApplied,
        }
    }
}

impl AddonDefaults {
    /// Builds defaults from facility addon master entries.
    ///
    /// Entries scoped to individual users are ignored. When a name appears
    /// more than once the first facility entry wins. Free-label fields with
    /// blank details keep "not applied".
    ///
    /// # Example
    ///
    /// ```
    /// use service_record_engine::config::AddonNames;
    /// use service_record_engine::derivation::AddonDefaults;
    /// use service_record_engine::models::{AddonFlag, AddonMasterEntry, AddonTarget};
    ///
    /// let entries = vec![
    ///     AddonMasterEntry {
    ///         name: "staff_allocation_addon".to_string(),
    ///         target: AddonTarget::Facility,
    ///         details: "addon (II)".to_string(),
    ///     },
    ///     AddonMasterEntry {
    ///         name: "specialized_support_system_addon".to_string(),
    ///         target: AddonTarget::Facility,
    ///         details: "maybe".to_string(),
    ///     },
    /// ];
    ///
    /// let defaults = AddonDefaults::from_entries(&entries, &AddonNames::default());
    /// assert_eq!(defaults.staff_allocation, "addon (II)");
    /// assert_eq!(defaults.welfare_specialist, "not applied");
    /// assert_eq!(defaults.specialized_support_system, AddonFlag::Applied);
    /// ```
    pub fn from_entries(entries: &[AddonMasterEntry], names: &AddonNames) -> Self {
        let details_for = |name: &str| {
            entries
                .iter()
                .find(|e| e.is_facility_scoped() && e.name == name)
                .map(|e| e.details.as_str())
        };

        let free_label = |name: &str| match details_for(name) {
            Some(details) if !details.trim().is_empty() => details.to_string(),
            _ => NOT_APPLIED.to_string(),
        };

        Self {
            welfare_specialist: free_label(&names.welfare_specialist),
            staff_allocation: free_label(&names.staff_allocation),
            specialized_support_system: details_for(&names.specialized_support_system)
                .map(coerce_specialized_system)
                .unwrap_or(AddonFlag::NotApplied),
        }
    }

    /// Writes the defaults onto a record.
    pub fn apply_to(&self, record: &mut SupportRecord) {
        record.welfare_specialist_addon = self.welfare_specialist.clone();
        record.staff_allocation_addon = self.staff_allocation.clone();
        record.specialized_support_system_addon = self.specialized_support_system;
    }
}

/// Maps a configured specialized-support-system value to a flag.
///
/// Only `"apply"` and `"not applied"` are taken as written. A configured entry
/// with any other value counts as applied.
pub fn coerce_specialized_system(details: &str) -> AddonFlag {
    match details {
        "apply" => AddonFlag::Applied,
        NOT_APPLIED => AddonFlag::NotApplied,
        _ => AddonFlag::Applied,
    }
}

/// Reads facility defaults from the addon master.
pub struct AddonDefaultsProvider {
    addons: Arc<dyn AddonMasterStore>,
    names: AddonNames,
}

impl AddonDefaultsProvider {
    /// Creates a provider over an addon master store.
    pub fn new(addons: Arc<dyn AddonMasterStore>, names: AddonNames) -> Self {
        Self { addons, names }
    }

    /// Loads the current facility defaults.
    ///
    /// Performs exactly one read against the addon master. A store failure is
    /// returned as-is; the caller decides whether to fall back to
    /// [`AddonDefaults::default`].
    pub async fn load_defaults(&self) -> StoreResult<AddonDefaults> {
        let entries = self.addons.list_facility_addons().await?;
        Ok(AddonDefaults::from_entries(&entries, &self.names))
    }
}
