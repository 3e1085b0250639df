use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::activity_handler::{self, StatsQuery};
use crate::middleware::auth::Claims;
use crate::models::activity::ActivityPayload;
use crate::store::AppStores;

#[post("")]
async fn create_activity(
    payload: web::Json<ActivityPayload>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    activity_handler::create_activity(payload, stores, claims).await
}

#[get("")]
async fn list_activities(
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    activity_handler::list_activities(stores, claims).await
}

#[get("/stats")]
async fn get_stats(
    query: web::Query<StatsQuery>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    activity_handler::get_stats(query, stores, claims).await
}

#[get("/{id}")]
async fn get_activity(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    activity_handler::get_activity(path, stores, claims).await
}

#[put("/{id}")]
async fn update_activity(
    path: web::Path<Uuid>,
    payload: web::Json<ActivityPayload>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    activity_handler::update_activity(path, payload, stores, claims).await
}

#[delete("/{id}")]
async fn delete_activity(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    activity_handler::delete_activity(path, stores, claims).await
}
