use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::activity::{Activity, ActivityPayload};
use crate::models::goal::{Goal, GoalPatch, GoalStatus};
use crate::models::user::User;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgActivityStore, PgGoalStore, PgUserStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Update email and/or password hash; returns the updated user, or
    /// `None` if the user does not exist.
    async fn update_profile(
        &self,
        id: Uuid,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, StoreError>;
    /// Paginated listing with an optional email substring filter.
    /// Returns the page of users together with the unfiltered-by-page total.
    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn insert(&self, activity: &Activity) -> Result<(), StoreError>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Activity>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, StoreError>;
    /// Owner-scoped update; returns `None` when the activity is not found
    /// for that owner.
    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        payload: &ActivityPayload,
    ) -> Result<Option<Activity>, StoreError>;
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn insert(&self, goal: &Goal) -> Result<(), StoreError>;
    async fn list_by_user(
        &self,
        user_id: Uuid,
        status: Option<GoalStatus>,
    ) -> Result<Vec<Goal>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Goal>, StoreError>;
    /// Owner-scoped partial update; bumps `updated_at` in the same write.
    /// Returns `None` when the goal is not found for that owner.
    async fn update_fields(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: &GoalPatch,
    ) -> Result<Option<Goal>, StoreError>;
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}

/// The set of store handles the application runs on. Injected once at
/// startup; handlers and the progress engine see only the trait objects.
#[derive(Clone)]
pub struct AppStores {
    pub users: Arc<dyn UserStore>,
    pub activities: Arc<dyn ActivityStore>,
    pub goals: Arc<dyn GoalStore>,
}

impl AppStores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            activities: Arc::new(PgActivityStore::new(pool.clone())),
            goals: Arc::new(PgGoalStore::new(pool)),
        }
    }

    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            activities: store.clone(),
            goals: store,
        }
    }
}
