//! Addon master model.

use serde::{Deserialize, Serialize};

/// Who an addon master setting applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonTarget {
    /// Applies uniformly to every user of the facility.
    #[serde(alias = "Facility")]
    Facility,
    /// Applies to individual users only.
    #[serde(alias = "User")]
    User,
}

/// A named billing addon setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonMasterEntry {
    /// The addon's fixed name.
    pub name: String,
    /// Facility-wide or per-user.
    pub target: AddonTarget,
    /// Free-text setting value, usually a tier label.
    #[serde(default)]
    pub details: String,
}

impl AddonMasterEntry {
    /// Returns true if this entry feeds facility-wide defaults.
    pub fn is_facility_scoped(&self) -> bool {
        self.target == AddonTarget::Facility
    }
}
