use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::goal_handler;
use crate::middleware::auth::Claims;
use crate::models::goal::{CreateGoalRequest, GoalListQuery, GoalPatch};
use crate::store::AppStores;

#[post("")]
async fn create_goal(
    form: web::Json<CreateGoalRequest>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    goal_handler::create_goal(form, stores, claims).await
}

#[get("")]
async fn list_goals(
    query: web::Query<GoalListQuery>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    goal_handler::list_goals(query, stores, claims).await
}

#[get("/{id}")]
async fn get_goal(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    goal_handler::get_goal(path, stores, claims).await
}

#[put("/{id}")]
async fn update_goal(
    path: web::Path<Uuid>,
    patch: web::Json<GoalPatch>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    goal_handler::update_goal(path, patch, stores, claims).await
}

#[delete("/{id}")]
async fn delete_goal(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    goal_handler::delete_goal(path, stores, claims).await
}

#[post("/{id}/progress")]
async fn update_progress(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    goal_handler::update_progress(path, stores, claims).await
}
