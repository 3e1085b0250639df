use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::activity::{Activity, ActivityPayload};
use crate::models::goal::{Goal, GoalPatch, GoalStatus};
use crate::models::user::User;
use crate::store::{ActivityStore, GoalStore, StoreError, UserStore};

/// In-memory implementation of the store traits.
///
/// A real fake: it applies the same owner scoping, ordering and
/// partial-update semantics as the Postgres stores, so the application can
/// run against it unchanged. The test suite uses it to exercise the full
/// HTTP surface without a database, and can inject per-goal update failures
/// to probe fault containment.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    activities: RwLock<HashMap<Uuid, Activity>>,
    goals: RwLock<HashMap<Uuid, Goal>>,
    failing_goal_updates: RwLock<HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `update_fields` call for the given goal fail.
    pub fn fail_goal_updates(&self, goal_id: Uuid) {
        self.failing_goal_updates
            .write()
            .expect("store lock poisoned")
            .insert(goal_id);
    }

    pub fn clear_goal_update_failures(&self) {
        self.failing_goal_updates
            .write()
            .expect("store lock poisoned")
            .clear();
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .write()
            .expect("store lock poisoned")
            .insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .expect("store lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .expect("store lock poisoned")
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().expect("store lock poisoned");
        match users.get_mut(&id) {
            Some(user) => {
                if let Some(email) = email {
                    user.email = email.to_string();
                }
                if let Some(password_hash) = password_hash {
                    user.password_hash = password_hash.to_string();
                }
                user.updated_at = Utc::now();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), StoreError> {
        let users = self.users.read().expect("store lock poisoned");
        let needle = search.filter(|s| !s.is_empty()).map(str::to_lowercase);
        let mut matched: Vec<User> = users
            .values()
            .filter(|u| match &needle {
                Some(needle) => u.email.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .users
            .write()
            .expect("store lock poisoned")
            .remove(&id)
            .is_some())
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn insert(&self, activity: &Activity) -> Result<(), StoreError> {
        self.activities
            .write()
            .expect("store lock poisoned")
            .insert(activity.id, activity.clone());
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Activity>, StoreError> {
        let activities = self.activities.read().expect("store lock poisoned");
        let mut owned: Vec<Activity> = activities
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.logical_date().cmp(&a.logical_date()));
        Ok(owned)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, StoreError> {
        Ok(self
            .activities
            .read()
            .expect("store lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        payload: &ActivityPayload,
    ) -> Result<Option<Activity>, StoreError> {
        let mut activities = self.activities.write().expect("store lock poisoned");
        match activities.get_mut(&id).filter(|a| a.user_id == user_id) {
            Some(activity) => {
                activity.activity_type = payload.activity_type;
                activity.duration = payload.duration;
                activity.calories = payload.calories;
                activity.distance = payload.distance;
                activity.notes = payload.notes.clone();
                if payload.date.is_some() {
                    activity.date = payload.date;
                }
                activity.updated_at = Utc::now();
                Ok(Some(activity.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut activities = self.activities.write().expect("store lock poisoned");
        match activities.get(&id) {
            Some(activity) if activity.user_id == user_id => {
                activities.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl GoalStore for MemoryStore {
    async fn insert(&self, goal: &Goal) -> Result<(), StoreError> {
        self.goals
            .write()
            .expect("store lock poisoned")
            .insert(goal.id, goal.clone());
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        status: Option<GoalStatus>,
    ) -> Result<Vec<Goal>, StoreError> {
        let goals = self.goals.read().expect("store lock poisoned");
        let mut owned: Vec<Goal> = goals
            .values()
            .filter(|g| g.user_id == user_id && status.map_or(true, |s| g.status == s))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Goal>, StoreError> {
        Ok(self
            .goals
            .read()
            .expect("store lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn update_fields(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: &GoalPatch,
    ) -> Result<Option<Goal>, StoreError> {
        if self
            .failing_goal_updates
            .read()
            .expect("store lock poisoned")
            .contains(&id)
        {
            return Err(StoreError::Unavailable(format!(
                "injected failure for goal {}",
                id
            )));
        }

        let mut goals = self.goals.write().expect("store lock poisoned");
        match goals.get_mut(&id).filter(|g| g.user_id == user_id) {
            Some(goal) => {
                if let Some(title) = &patch.title {
                    goal.title = title.clone();
                }
                if let Some(description) = &patch.description {
                    goal.description = Some(description.clone());
                }
                if let Some(goal_type) = patch.goal_type {
                    goal.goal_type = goal_type;
                }
                if let Some(target_value) = patch.target_value {
                    goal.target_value = target_value;
                }
                if let Some(current_value) = patch.current_value {
                    goal.current_value = current_value;
                }
                if let Some(start_date) = patch.start_date {
                    goal.start_date = start_date;
                }
                if let Some(end_date) = patch.end_date {
                    goal.end_date = end_date;
                }
                if let Some(status) = patch.status {
                    goal.status = status;
                }
                goal.updated_at = Utc::now();
                Ok(Some(goal.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut goals = self.goals.write().expect("store lock poisoned");
        match goals.get(&id) {
            Some(goal) if goal.user_id == user_id => {
                goals.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
