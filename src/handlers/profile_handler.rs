use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;

use crate::errors::ServiceError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::user::{UpdateProfileRequest, UserResponse};
use crate::store::AppStores;
use crate::utils::password::{hash_password, verify_password};

#[tracing::instrument(name = "Get user profile", skip(stores, claims), fields(email = %claims.email))]
pub async fn get_profile(
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;

    let user = stores
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

#[tracing::instrument(
    name = "Update user profile",
    skip(stores, claims, form),
    fields(email = %claims.email)
)]
pub async fn update_profile(
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
    form: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = claims
        .user_id()
        .ok_or_else(|| ServiceError::Invalid("Invalid user ID".into()))?;

    let current_user = stores
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    let mut new_email: Option<&str> = None;
    if let Some(email) = form.email.as_deref() {
        if email != current_user.email {
            if email.trim().is_empty() || !email.contains('@') {
                return Err(ServiceError::Invalid("A valid email is required".into()));
            }
            if let Some(existing) = stores.users.find_by_email(email).await? {
                if existing.id != user_id {
                    return Err(ServiceError::Invalid("Email already in use".into()));
                }
            }
            new_email = Some(email);
        }
    }

    let mut new_password_hash: Option<String> = None;
    if let Some(new_password) = &form.new_password {
        let current_password = form
            .current_password
            .as_ref()
            .ok_or_else(|| ServiceError::Invalid("Current password is required".into()))?;
        if !verify_password(current_password.expose_secret(), &current_user.password_hash) {
            return Err(ServiceError::Invalid("Current password is incorrect".into()));
        }
        if new_password.expose_secret().len() < 6 {
            return Err(ServiceError::Invalid(
                "Password must be at least 6 characters".into(),
            ));
        }
        new_password_hash = Some(hash_password(new_password.expose_secret()));
    }

    if new_email.is_none() && new_password_hash.is_none() {
        return Err(ServiceError::Invalid("No changes provided".into()));
    }

    let updated = stores
        .users
        .update_profile(user_id, new_email, new_password_hash.as_deref())
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Profile updated successfully",
        UserResponse::from(&updated),
    )))
}
