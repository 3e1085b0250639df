// src/routes/auth.rs
use actix_web::{post, web, HttpResponse};

use crate::config::jwt::JwtSettings;
use crate::errors::ServiceError;
use crate::handlers::auth_handler::{login_user, refresh_token};
use crate::handlers::registration_handler::register_user;
use crate::models::auth::{LoginRequest, RefreshRequest};
use crate::models::user::RegistrationRequest;
use crate::store::AppStores;

#[post("/register")]
async fn register(
    user_form: web::Json<RegistrationRequest>,
    stores: web::Data<AppStores>,
) -> Result<HttpResponse, ServiceError> {
    register_user(user_form, stores).await
}

#[post("/login")]
async fn login(
    login_form: web::Json<LoginRequest>,
    stores: web::Data<AppStores>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, ServiceError> {
    login_user(login_form, stores, jwt_settings).await
}

#[post("/refresh")]
async fn refresh(
    refresh_form: web::Json<RefreshRequest>,
    stores: web::Data<AppStores>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, ServiceError> {
    refresh_token(refresh_form, stores, jwt_settings).await
}
