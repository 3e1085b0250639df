use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::goals::ProgressEngine;
use crate::middleware::auth::Claims;
use crate::models::activity::{
    Activity, ActivityPayload, ActivityStats, StatsPeriod, TypeBreakdown,
};
use crate::store::AppStores;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub period: StatsPeriod,
}

#[tracing::instrument(
    name = "Create activity",
    skip(payload, stores, claims),
    fields(email = %claims.email, activity_type = %payload.activity_type)
)]
pub async fn create_activity(
    payload: web::Json<ActivityPayload>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    payload.validate().map_err(ServiceError::Invalid)?;

    let now = Utc::now();
    let activity = Activity {
        id: Uuid::new_v4(),
        user_id,
        activity_type: payload.activity_type,
        duration: payload.duration,
        calories: payload.calories,
        distance: payload.distance,
        notes: payload.notes.clone(),
        date: payload.date,
        created_at: now,
        updated_at: now,
    };
    stores.activities.insert(&activity).await?;

    // The activity is committed; goal refresh is best-effort from here on
    let summary = ProgressEngine::new(&stores)
        .refresh_active_goals(user_id)
        .await;
    tracing::debug!("Goal refresh after activity create: {:?}", summary);

    Ok(HttpResponse::Created().json(activity))
}

#[tracing::instrument(name = "List activities", skip(stores, claims), fields(email = %claims.email))]
pub async fn list_activities(
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let activities = stores.activities.list_by_user(user_id).await?;
    Ok(HttpResponse::Ok().json(activities))
}

#[tracing::instrument(name = "Get activity", skip(stores, claims), fields(email = %claims.email))]
pub async fn get_activity(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let activity = find_owned_activity(&stores, path.into_inner(), user_id).await?;
    Ok(HttpResponse::Ok().json(activity))
}

#[tracing::instrument(
    name = "Update activity",
    skip(payload, stores, claims),
    fields(email = %claims.email)
)]
pub async fn update_activity(
    path: web::Path<Uuid>,
    payload: web::Json<ActivityPayload>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let activity_id = path.into_inner();

    find_owned_activity(&stores, activity_id, user_id).await?;
    payload.validate().map_err(ServiceError::Invalid)?;

    let updated = stores
        .activities
        .update(activity_id, user_id, &payload)
        .await?
        .ok_or(ServiceError::NotFound("Activity"))?;

    let summary = ProgressEngine::new(&stores)
        .refresh_active_goals(user_id)
        .await;
    tracing::debug!("Goal refresh after activity update: {:?}", summary);

    Ok(HttpResponse::Ok().json(updated))
}

#[tracing::instrument(name = "Delete activity", skip(stores, claims), fields(email = %claims.email))]
pub async fn delete_activity(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let activity_id = path.into_inner();

    find_owned_activity(&stores, activity_id, user_id).await?;
    stores.activities.delete(activity_id, user_id).await?;

    let summary = ProgressEngine::new(&stores)
        .refresh_active_goals(user_id)
        .await;
    tracing::debug!("Goal refresh after activity delete: {:?}", summary);

    Ok(HttpResponse::Ok().json(json!({ "message": "Activity deleted successfully" })))
}

#[tracing::instrument(name = "Get activity stats", skip(stores, claims), fields(email = %claims.email))]
pub async fn get_stats(
    query: web::Query<StatsQuery>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;
    let activities = stores.activities.list_by_user(user_id).await?;
    Ok(HttpResponse::Ok().json(compute_stats(&activities, query.period)))
}

async fn find_owned_activity(
    stores: &AppStores,
    activity_id: Uuid,
    user_id: Uuid,
) -> Result<Activity, ServiceError> {
    let activity = stores
        .activities
        .find_by_id(activity_id)
        .await?
        .ok_or(ServiceError::NotFound("Activity"))?;
    if activity.user_id != user_id {
        return Err(ServiceError::AccessDenied);
    }
    Ok(activity)
}

/// Aggregate totals and a per-type breakdown over the activities whose
/// logical date falls inside the requested period.
pub fn compute_stats(activities: &[Activity], period: StatsPeriod) -> ActivityStats {
    let cutoff = period.days().map(|days| Utc::now() - Duration::days(days));
    let mut stats = ActivityStats {
        period: period.as_str().to_string(),
        total_activities: 0,
        total_duration: 0.0,
        total_calories: 0.0,
        total_distance: 0.0,
        avg_duration: 0.0,
        by_type: Default::default(),
    };

    for activity in activities {
        if let Some(cutoff) = cutoff {
            if activity.logical_date() < cutoff {
                continue;
            }
        }
        let duration = activity.duration;
        let calories = activity.calories.unwrap_or(0.0);
        let distance = activity.distance.unwrap_or(0.0);

        stats.total_activities += 1;
        stats.total_duration += duration;
        stats.total_calories += calories;
        stats.total_distance += distance;

        let entry: &mut TypeBreakdown = stats
            .by_type
            .entry(activity.activity_type.to_string())
            .or_default();
        entry.count += 1;
        entry.total_duration += duration;
        entry.total_calories += calories;
        entry.total_distance += distance;
    }

    if stats.total_activities > 0 {
        stats.avg_duration = stats.total_duration / stats.total_activities as f64;
    }
    stats
}
