use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::activity::Activity;
use crate::models::goal::{Goal, GoalPatch, GoalStatus, GoalType};
use crate::store::{ActivityStore, AppStores, GoalStore};

/// Derives a goal's progress from the owner's activity history and drives
/// its status lifecycle. All goal progress writes go through here.
pub struct ProgressEngine {
    pub(crate) activities: Arc<dyn ActivityStore>,
    pub(crate) goals: Arc<dyn GoalStore>,
}

impl ProgressEngine {
    pub fn new(stores: &AppStores) -> Self {
        Self {
            activities: stores.activities.clone(),
            goals: stores.goals.clone(),
        }
    }

    /// Recompute a goal's `current_value` from the owner's activities and
    /// persist it together with the resulting status in a single write.
    ///
    /// A goal whose aggregate reaches the target becomes `completed`.
    /// Anything short of the target leaves the stored status untouched, so
    /// a `completed` or `cancelled` goal never drops back to `active` here.
    #[tracing::instrument(
        name = "Recompute goal progress",
        skip(self),
        fields(goal_id = %goal_id, user_id = %user_id)
    )]
    pub async fn recompute(&self, goal_id: Uuid, user_id: Uuid) -> Result<Goal, ServiceError> {
        let goal = self
            .goals
            .find_by_id(goal_id)
            .await?
            .ok_or(ServiceError::NotFound("Goal"))?;
        if goal.user_id != user_id {
            return Err(ServiceError::AccessDenied);
        }

        let activities = self.activities.list_by_user(user_id).await?;
        let current_value = aggregate_progress(&goal, &activities);

        let status = if current_value >= goal.target_value {
            GoalStatus::Completed
        } else {
            goal.status
        };

        let patch = GoalPatch {
            current_value: Some(current_value),
            status: Some(status),
            ..Default::default()
        };
        let updated = self
            .goals
            .update_fields(goal_id, user_id, &patch)
            .await?
            .ok_or(ServiceError::NotFound("Goal"))?;

        if updated.status == GoalStatus::Completed && goal.status != GoalStatus::Completed {
            tracing::info!(
                "Goal {} ({}) reached its target: {:.2}/{:.2}",
                updated.id,
                updated.title,
                updated.current_value,
                updated.target_value
            );
        }

        Ok(updated)
    }

    /// Demote overdue unmet goals to `cancelled`. Runs before every goal
    /// listing so callers always see up-to-date statuses. A storage failure
    /// propagates and aborts the listing request.
    #[tracing::instrument(name = "Sweep expired goals", skip(self), fields(user_id = %user_id))]
    pub async fn sweep_expired(&self, user_id: Uuid) -> Result<usize, ServiceError> {
        let today = Utc::now().date_naive();
        let active = self
            .goals
            .list_by_user(user_id, Some(GoalStatus::Active))
            .await?;

        let mut cancelled = 0;
        for goal in active {
            if goal.end_date < today && goal.current_value < goal.target_value {
                let patch = GoalPatch {
                    status: Some(GoalStatus::Cancelled),
                    ..Default::default()
                };
                self.goals
                    .update_fields(goal.id, user_id, &patch)
                    .await?
                    .ok_or(ServiceError::NotFound("Goal"))?;
                cancelled += 1;
            }
        }

        if cancelled > 0 {
            tracing::info!("Marked {} expired goal(s) as cancelled", cancelled);
        }
        Ok(cancelled)
    }
}

/// Aggregate the activities that fall inside the goal's date window,
/// according to the goal's metric. The result is always a non-negative
/// finite number.
pub fn aggregate_progress(goal: &Goal, activities: &[Activity]) -> f64 {
    let relevant = activities
        .iter()
        .filter(|a| window_contains(goal, a.logical_date()));

    let raw: f64 = match goal.goal_type {
        GoalType::Duration => relevant.map(|a| sanitize(a.duration)).sum(),
        GoalType::Distance => relevant.map(|a| opt_sanitize(a.distance)).sum(),
        GoalType::Calories => relevant.map(|a| opt_sanitize(a.calories)).sum(),
        GoalType::ActivitiesCount => relevant.count() as f64,
    };

    if raw.is_finite() {
        raw.max(0.0)
    } else {
        0.0
    }
}

/// Whether a timestamp falls inside `[start_date 00:00:00, end_date
/// 23:59:59.999]` (UTC). The end date is inclusive through the last
/// millisecond of the day, so same-day activities count regardless of
/// time of day.
pub fn window_contains(goal: &Goal, at: DateTime<Utc>) -> bool {
    let start = goal
        .start_date
        .and_hms_opt(0, 0, 0)
        .expect("valid start of day")
        .and_utc();
    let end = goal
        .end_date
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("valid end of day")
        .and_utc();
    at >= start && at <= end
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn opt_sanitize(value: Option<f64>) -> f64 {
    value.map_or(0.0, sanitize)
}
