use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::goals::ProgressEngine;
use crate::middleware::auth::Claims;
use crate::models::goal::{CreateGoalRequest, Goal, GoalListQuery, GoalPatch, GoalStatus};
use crate::store::AppStores;

#[tracing::instrument(
    name = "Create goal",
    skip(form, stores, claims),
    fields(email = %claims.email, goal_type = %form.goal_type)
)]
pub async fn create_goal(
    form: web::Json<CreateGoalRequest>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    form.validate().map_err(ServiceError::Invalid)?;

    let now = Utc::now();
    let goal = Goal {
        id: Uuid::new_v4(),
        user_id,
        title: form.title.clone(),
        description: form.description.clone(),
        goal_type: form.goal_type,
        target_value: form.target_value,
        current_value: 0.0,
        start_date: form.start_date,
        end_date: form.end_date,
        status: GoalStatus::Active,
        created_at: now,
        updated_at: now,
    };
    stores.goals.insert(&goal).await?;

    Ok(HttpResponse::Created().json(goal))
}

/// Listing demotes overdue unmet goals first, so clients always see
/// up-to-date statuses. A sweep failure aborts the request.
#[tracing::instrument(name = "List goals", skip(stores, claims), fields(email = %claims.email))]
pub async fn list_goals(
    query: web::Query<GoalListQuery>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;

    ProgressEngine::new(&stores).sweep_expired(user_id).await?;

    let goals = stores.goals.list_by_user(user_id, query.status).await?;
    Ok(HttpResponse::Ok().json(goals))
}

#[tracing::instrument(name = "Get goal", skip(stores, claims), fields(email = %claims.email))]
pub async fn get_goal(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let goal = find_owned_goal(&stores, path.into_inner(), user_id).await?;
    Ok(HttpResponse::Ok().json(goal))
}

#[tracing::instrument(
    name = "Update goal",
    skip(patch, stores, claims),
    fields(email = %claims.email)
)]
pub async fn update_goal(
    path: web::Path<Uuid>,
    patch: web::Json<GoalPatch>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let goal_id = path.into_inner();

    patch.validate().map_err(ServiceError::Invalid)?;
    find_owned_goal(&stores, goal_id, user_id).await?;

    // A caller-supplied current_value or status is an explicit override;
    // the next activity mutation recomputes both.
    let updated = stores
        .goals
        .update_fields(goal_id, user_id, &patch)
        .await?
        .ok_or(ServiceError::NotFound("Goal"))?;

    Ok(HttpResponse::Ok().json(updated))
}

#[tracing::instrument(name = "Delete goal", skip(stores, claims), fields(email = %claims.email))]
pub async fn delete_goal(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let goal_id = path.into_inner();

    find_owned_goal(&stores, goal_id, user_id).await?;
    stores.goals.delete(goal_id, user_id).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Goal deleted successfully" })))
}

#[tracing::instrument(name = "Recompute goal progress", skip(stores, claims), fields(email = %claims.email))]
pub async fn update_progress(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let goal = ProgressEngine::new(&stores)
        .recompute(path.into_inner(), user_id)
        .await?;
    Ok(HttpResponse::Ok().json(goal))
}

async fn find_owned_goal(
    stores: &AppStores,
    goal_id: Uuid,
    user_id: Uuid,
) -> Result<Goal, ServiceError> {
    let goal = stores
        .goals
        .find_by_id(goal_id)
        .await?
        .ok_or(ServiceError::NotFound("Goal"))?;
    if goal.user_id != user_id {
        return Err(ServiceError::AccessDenied);
    }
    Ok(goal)
}
