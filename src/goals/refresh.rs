use serde::Serialize;
use uuid::Uuid;

use crate::goals::progress::ProgressEngine;
use crate::models::goal::GoalStatus;

/// Outcome of an activity-mutation refresh. The primary activity write has
/// already committed when this is produced; `failed > 0` means some goals
/// are stale until the next mutation or direct recompute corrects them.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
}

impl RefreshSummary {
    pub fn fully_consistent(&self) -> bool {
        self.failed == 0
    }
}

impl ProgressEngine {
    /// Recompute every active goal of the user after an activity mutation.
    ///
    /// Best-effort: each goal is recomputed independently and failures are
    /// logged and counted, never propagated. One goal's storage error must
    /// not block the others or fail the activity mutation that triggered
    /// the refresh.
    #[tracing::instrument(
        name = "Refresh active goals",
        skip(self),
        fields(user_id = %user_id)
    )]
    pub async fn refresh_active_goals(&self, user_id: Uuid) -> RefreshSummary {
        let active = match self
            .goals
            .list_by_user(user_id, Some(GoalStatus::Active))
            .await
        {
            Ok(goals) => goals,
            Err(e) => {
                tracing::error!("Failed to list active goals for refresh: {:?}", e);
                return RefreshSummary::default();
            }
        };

        let mut summary = RefreshSummary::default();
        for goal in active {
            match self.recompute(goal.id, user_id).await {
                Ok(_) => summary.refreshed += 1,
                Err(e) => {
                    tracing::error!("Failed to refresh goal {}: {:?}", goal.id, e);
                    summary.failed += 1;
                }
            }
        }

        if summary.failed > 0 {
            tracing::warn!(
                "Goal refresh left {} of {} goal(s) stale",
                summary.failed,
                summary.refreshed + summary.failed
            );
        }
        summary
    }
}
