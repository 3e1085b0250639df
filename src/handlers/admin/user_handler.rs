use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::middleware::auth::Claims;
use crate::models::common::{PaginatedResponse, PaginationInfo};
use crate::models::user::UserResponse;
use crate::store::AppStores;

#[derive(Debug, Deserialize)]
pub struct UserQueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

// GET /api/users - List users with pagination and email search
#[tracing::instrument(name = "Admin list users", skip(stores, claims), fields(admin = %claims.email))]
pub async fn get_users(
    query: web::Query<UserQueryParams>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let (users, total) = stores
        .users
        .list(query.search.as_deref(), limit, offset)
        .await?;

    let data: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(PaginatedResponse {
        data,
        pagination: PaginationInfo::new(page, limit, total),
    }))
}

// DELETE /api/users/{id} - Remove a user account
#[tracing::instrument(name = "Admin delete user", skip(stores, claims), fields(admin = %claims.email))]
pub async fn delete_user(
    path: web::Path<Uuid>,
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let target_id = path.into_inner();
    let admin_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;

    if target_id == admin_id {
        return Err(ServiceError::Invalid(
            "You cannot delete your own account".into(),
        ));
    }

    stores
        .users
        .find_by_id(target_id)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    stores.users.delete(target_id).await?;
    tracing::info!("Deleted user {}", target_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}
