//! Planned duration lookup from the user's current support plan.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculation::weekday_index;
use crate::store::{PlanStore, StoreResult};

/// The planned duration found for one event day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDuration {
    /// The plan the duration came from.
    pub plan_id: String,
    /// The schedule index used (Monday=0 … Sunday=6).
    pub weekday_index: u32,
    /// Planned service duration in hours.
    pub hours: Decimal,
}

/// Resolves the statutory planned duration for a user on a date.
///
/// Only the most recently created Final plan is consulted. A missing plan, a
/// missing weekday entry and an unparseable duration all resolve to
/// `Ok(None)`; `Err` means the plan store itself could not be read, and it is
/// up to the caller to fall back.
pub struct ScheduleResolver {
    plans: Arc<dyn PlanStore>,
}

impl ScheduleResolver {
    /// Creates a resolver over a plan store.
    pub fn new(plans: Arc<dyn PlanStore>) -> Self {
        Self { plans }
    }

    /// Looks up the planned duration for `user_id` on `date`.
    ///
    /// Performs exactly one read against the plan store.
    pub async fn resolve(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> StoreResult<Option<PlannedDuration>> {
        let plans = self.plans.find_final_plans(user_id).await?;

        // Stores are asked for newest-first Final plans; do not rely on it.
        let Some(plan) = plans
            .into_iter()
            .filter(|p| p.is_final())
            .max_by_key(|p| p.created_at)
        else {
            debug!(user_id = %user_id, "No final support plan");
            return Ok(None);
        };

        let weekday = weekday_index(date);
        let Some(slot) = plan.slot_for(weekday) else {
            debug!(
                user_id = %user_id,
                plan_id = %plan.id,
                weekday_index = weekday,
                "Support plan has no entry for weekday"
            );
            return Ok(None);
        };

        match slot.planned_hours() {
            Some(hours) => Ok(Some(PlannedDuration {
                plan_id: plan.id,
                weekday_index: weekday,
                hours,
            })),
            None => {
                warn!(
                    user_id = %user_id,
                    plan_id = %plan.id,
                    weekday_index = weekday,
                    duration = ?slot.duration,
                    "Planned duration missing or unparseable"
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanStatus, ScheduleSlot, SupportPlan};
    use crate::store::{Collaborator, MemoryStore, StoreError};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn slot(duration: &str) -> ScheduleSlot {
        ScheduleSlot {
            start: Some("14:00".to_string()),
            end: Some("17:00".to_string()),
            duration: Some(duration.to_string()),
        }
    }

    fn plan(id: &str, status: PlanStatus, created_day: u32, schedule: &[(u32, &str)]) -> SupportPlan {
        SupportPlan {
            id: id.to_string(),
            user_id: "U1".to_string(),
            status,
            created_at: Utc.with_ymd_and_hms(2025, 4, created_day, 9, 0, 0).unwrap(),
            standard_schedule: schedule
                .iter()
                .map(|(day, duration)| (*day, slot(duration)))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn resolver(store: &MemoryStore) -> ScheduleResolver {
        ScheduleResolver::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_resolves_monday_entry() {
        let store = MemoryStore::new();
        store.add_plan(plan("p1", PlanStatus::Final, 1, &[(0, "2.5"), (4, "1.0")]));

        // 2025-06-02 is a Monday.
        let planned = resolver(&store)
            .resolve("U1", make_date("2025-06-02"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(planned.hours, dec("2.5"));
        assert_eq!(planned.weekday_index, 0);
        assert_eq!(planned.plan_id, "p1");
    }

    #[tokio::test]
    async fn test_resolves_sunday_as_index_six() {
        let store = MemoryStore::new();
        store.add_plan(plan("p1", PlanStatus::Final, 1, &[(6, "4"), (0, "2")]));

        let planned = resolver(&store)
            .resolve("U1", make_date("2025-06-08"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(planned.hours, dec("4"));
        assert_eq!(planned.weekday_index, 6);
    }

    #[tokio::test]
    async fn test_newest_final_plan_wins() {
        let store = MemoryStore::new();
        store.add_plan(plan("old", PlanStatus::Final, 1, &[(0, "1.5")]));
        store.add_plan(plan("new", PlanStatus::Final, 15, &[(0, "3.0")]));
        store.add_plan(plan("draft", PlanStatus::Draft, 20, &[(0, "4.5")]));

        let planned = resolver(&store)
            .resolve("U1", make_date("2025-06-02"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(planned.plan_id, "new");
        assert_eq!(planned.hours, dec("3.0"));
    }

    #[tokio::test]
    async fn test_no_plan_is_empty() {
        let store = MemoryStore::new();
        let planned = resolver(&store)
            .resolve("U1", make_date("2025-06-02"))
            .await
            .unwrap();
        assert_eq!(planned, None);
    }

    #[tokio::test]
    async fn test_only_draft_plan_is_empty() {
        let store = MemoryStore::new();
        store.add_plan(plan("draft", PlanStatus::Draft, 1, &[(0, "2.0")]));

        let planned = resolver(&store)
            .resolve("U1", make_date("2025-06-02"))
            .await
            .unwrap();
        assert_eq!(planned, None);
    }

    #[tokio::test]
    async fn test_missing_weekday_is_empty() {
        let store = MemoryStore::new();
        store.add_plan(plan("p1", PlanStatus::Final, 1, &[(1, "2.0")]));

        let planned = resolver(&store)
            .resolve("U1", make_date("2025-06-02"))
            .await
            .unwrap();
        assert_eq!(planned, None);
    }

    #[tokio::test]
    async fn test_unparseable_duration_is_empty() {
        let store = MemoryStore::new();
        store.add_plan(plan("p1", PlanStatus::Final, 1, &[(0, "two hours")]));

        let planned = resolver(&store)
            .resolve("U1", make_date("2025-06-02"))
            .await
            .unwrap();
        assert_eq!(planned, None);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let store = MemoryStore::new();
        store.set_outage(Collaborator::Plans, true);

        let result = resolver(&store).resolve("U1", make_date("2025-06-02")).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }

    /// A plan store that ignores ordering and status filtering.
    struct CarelessPlanStore(Vec<SupportPlan>);

    #[async_trait]
    impl PlanStore for CarelessPlanStore {
        async fn find_final_plans(&self, _user_id: &str) -> StoreResult<Vec<SupportPlan>> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_unsorted_store_results_still_pick_newest_final() {
        let store = CarelessPlanStore(vec![
            plan("old", PlanStatus::Final, 1, &[(0, "1.0")]),
            plan("draft", PlanStatus::Draft, 25, &[(0, "5.0")]),
            plan("new", PlanStatus::Final, 12, &[(0, "2.0")]),
        ]);

        let planned = ScheduleResolver::new(Arc::new(store))
            .resolve("U1", make_date("2025-06-02"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(planned.plan_id, "new");
    }
}
