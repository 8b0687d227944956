//! In-memory store implementation.
//!
//! [`MemoryStore`] implements all three collaborator traits over shared
//! in-process maps. It backs the test suite, the benchmarks and the bundled
//! server binary, and can simulate an outage of any single collaborator.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{AddonMasterEntry, RecordKey, SupportPlan, SupportRecord};

use super::{AddonMasterStore, PlanStore, RecordStore, StoreError, StoreResult};

/// One of the external collaborators the engine reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    /// Support plan lookups.
    Plans,
    /// Addon master lookups.
    Addons,
    /// Record existence checks.
    RecordReads,
    /// Record inserts.
    RecordWrites,
}

/// Initial contents for a [`MemoryStore`], as loaded from a JSON seed file.
///
/// # Example
///
/// ```
/// use service_record_engine::store::SeedData;
///
/// let seed: SeedData = serde_json::from_str(r#"{
///     "addons": [{"name": "staff_allocation_addon", "target": "facility", "details": "addon (I)"}]
/// }"#).unwrap();
/// assert_eq!(seed.addons.len(), 1);
/// assert!(seed.plans.is_empty());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    /// Support plans, Draft and Final.
    pub plans: Vec<SupportPlan>,
    /// Addon master entries of any scope.
    pub addons: Vec<AddonMasterEntry>,
    /// Records that already exist.
    pub records: Vec<SupportRecord>,
}

/// In-memory document store.
///
/// Clones share the same underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Default)]
struct MemoryData {
    plans: Vec<SupportPlan>,
    addons: Vec<AddonMasterEntry>,
    records: HashMap<String, SupportRecord>,
    outages: HashSet<Collaborator>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with seed data.
    pub fn from_seed(seed: SeedData) -> Self {
        let records = seed
            .records
            .into_iter()
            .map(|r| (r.document_id.clone(), r))
            .collect();

        Self {
            data: Arc::new(RwLock::new(MemoryData {
                plans: seed.plans,
                addons: seed.addons,
                records,
                outages: HashSet::new(),
            })),
        }
    }

    /// Loads seed data from a JSON file.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path_str = path.as_ref().display().to_string();

        let content = fs::read_to_string(path.as_ref()).map_err(|_| {
            EngineError::ConfigNotFound {
                path: path_str.clone(),
            }
        })?;

        let seed: SeedData =
            serde_json::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Ok(Self::from_seed(seed))
    }

    /// Adds a support plan.
    pub fn add_plan(&self, plan: SupportPlan) {
        if let Ok(mut data) = self.write() {
            data.plans.push(plan);
        }
    }

    /// Adds an addon master entry.
    pub fn add_addon(&self, entry: AddonMasterEntry) {
        if let Ok(mut data) = self.write() {
            data.addons.push(entry);
        }
    }

    /// Makes a collaborator fail every call until cleared.
    pub fn set_outage(&self, collaborator: Collaborator, down: bool) {
        if let Ok(mut data) = self.write() {
            if down {
                data.outages.insert(collaborator);
            } else {
                data.outages.remove(&collaborator);
            }
        }
    }

    /// Returns the number of stored records.
    pub fn record_count(&self) -> usize {
        self.read().map(|d| d.records.len()).unwrap_or(0)
    }

    /// Returns the record stored under a key.
    pub fn record(&self, key: &RecordKey) -> Option<SupportRecord> {
        self.read()
            .ok()
            .and_then(|d| d.records.get(&key.document_id()).cloned())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, MemoryData>> {
        self.data
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, MemoryData>> {
        self.data
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl MemoryData {
    fn check(&self, collaborator: Collaborator) -> StoreResult<()> {
        if self.outages.contains(&collaborator) {
            return Err(StoreError::Unavailable(format!(
                "{:?} collaborator is down",
                collaborator
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn find_final_plans(&self, user_id: &str) -> StoreResult<Vec<SupportPlan>> {
        let data = self.read()?;
        data.check(Collaborator::Plans)?;

        let mut plans: Vec<SupportPlan> = data
            .plans
            .iter()
            .filter(|p| p.user_id == user_id && p.is_final())
            .cloned()
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }
}

#[async_trait]
impl AddonMasterStore for MemoryStore {
    async fn list_facility_addons(&self) -> StoreResult<Vec<AddonMasterEntry>> {
        let data = self.read()?;
        data.check(Collaborator::Addons)?;

        Ok(data
            .addons
            .iter()
            .filter(|a| a.is_facility_scoped())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_record(
        &self,
        date: NaiveDate,
        user_id: &str,
    ) -> StoreResult<Option<SupportRecord>> {
        let data = self.read()?;
        data.check(Collaborator::RecordReads)?;

        let document_id = RecordKey::new(date, user_id).document_id();
        Ok(data.records.get(&document_id).cloned())
    }

    async fn insert_record(&self, record: &SupportRecord) -> StoreResult<()> {
        let mut data = self.write()?;
        data.check(Collaborator::RecordWrites)?;

        if data.records.contains_key(&record.document_id) {
            return Err(StoreError::DuplicateKey {
                document_id: record.document_id.clone(),
            });
        }
        data.records
            .insert(record.document_id.clone(), record.clone());
        Ok(())
    }
}
