use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::activity::{Activity, ActivityPayload};
use crate::models::goal::{Goal, GoalPatch, GoalStatus};
use crate::models::user::User;
use crate::store::{ActivityStore, GoalStore, StoreError, UserStore};

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), StoreError> {
        let pattern = search
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE ($1::text IS NULL OR email ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE ($1::text IS NULL OR email ILIKE $1)
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((users, total.0))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgActivityStore {
    pool: PgPool,
}

impl PgActivityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for PgActivityStore {
    async fn insert(&self, activity: &Activity) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO activities
                (id, user_id, activity_type, duration, calories, distance, notes, date,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(activity.id)
        .bind(activity.user_id)
        .bind(activity.activity_type)
        .bind(activity.duration)
        .bind(activity.calories)
        .bind(activity.distance)
        .bind(&activity.notes)
        .bind(activity.date)
        .bind(activity.created_at)
        .bind(activity.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Activity>, StoreError> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, user_id, activity_type, duration, calories, distance, notes, date,
                   created_at, updated_at
            FROM activities
            WHERE user_id = $1
            ORDER BY COALESCE(date, created_at) DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Activity>, StoreError> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, user_id, activity_type, duration, calories, distance, notes, date,
                   created_at, updated_at
            FROM activities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(activity)
    }

    async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        payload: &ActivityPayload,
    ) -> Result<Option<Activity>, StoreError> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities
            SET activity_type = $3, duration = $4, calories = $5, distance = $6,
                notes = $7, date = COALESCE($8, date), updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, activity_type, duration, calories, distance, notes, date,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(payload.activity_type)
        .bind(payload.duration)
        .bind(payload.calories)
        .bind(payload.distance)
        .bind(&payload.notes)
        .bind(payload.date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(activity)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PgGoalStore {
    pool: PgPool,
}

impl PgGoalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalStore for PgGoalStore {
    async fn insert(&self, goal: &Goal) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO goals
                (id, user_id, title, description, goal_type, target_value, current_value,
                 start_date, end_date, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(goal.id)
        .bind(goal.user_id)
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.goal_type)
        .bind(goal.target_value)
        .bind(goal.current_value)
        .bind(goal.start_date)
        .bind(goal.end_date)
        .bind(goal.status)
        .bind(goal.created_at)
        .bind(goal.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        status: Option<GoalStatus>,
    ) -> Result<Vec<Goal>, StoreError> {
        let goals = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, user_id, title, description, goal_type, target_value, current_value,
                   start_date, end_date, status, created_at, updated_at
            FROM goals
            WHERE user_id = $1 AND ($2::goal_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(goals)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Goal>, StoreError> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, user_id, title, description, goal_type, target_value, current_value,
                   start_date, end_date, status, created_at, updated_at
            FROM goals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(goal)
    }

    async fn update_fields(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: &GoalPatch,
    ) -> Result<Option<Goal>, StoreError> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                goal_type = COALESCE($5, goal_type),
                target_value = COALESCE($6, target_value),
                current_value = COALESCE($7, current_value),
                start_date = COALESCE($8, start_date),
                end_date = COALESCE($9, end_date),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, goal_type, target_value, current_value,
                      start_date, end_date, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.goal_type)
        .bind(patch.target_value)
        .bind(patch.current_value)
        .bind(patch.start_date)
        .bind(patch.end_date)
        .bind(patch.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(goal)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
