// src/handlers/auth_handler.rs
use actix_web::{web, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::errors::ServiceError;
use crate::middleware::auth::Claims;
use crate::models::auth::{LoginRequest, LoginResponse, RefreshRequest};
use crate::models::user::{User, UserResponse};
use crate::store::AppStores;
use crate::utils::password::verify_password;

/// Claims carried by refresh tokens. The role is re-read from the store
/// when the token is redeemed.
#[derive(Serialize, Deserialize)]
struct RefreshClaims {
    sub: String,
    exp: usize,
}

fn issue_token_pair(user: &User, jwt_settings: &JwtSettings) -> Result<(String, String), ServiceError> {
    let now = Utc::now();

    let access_exp = now
        .checked_add_signed(Duration::minutes(jwt_settings.expiration_minutes))
        .expect("Valid timestamp")
        .timestamp() as usize;
    let access_claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp: access_exp,
    };
    let access_token = encode(
        &Header::default(),
        &access_claims,
        &EncodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
    )
    .map_err(|e| ServiceError::Internal(format!("Failed to sign access token: {}", e)))?;

    let refresh_exp = now
        .checked_add_signed(Duration::days(jwt_settings.refresh_expiration_days))
        .expect("Valid timestamp")
        .timestamp() as usize;
    let refresh_claims = RefreshClaims {
        sub: user.id.to_string(),
        exp: refresh_exp,
    };
    let refresh_token = encode(
        &Header::default(),
        &refresh_claims,
        &EncodingKey::from_secret(jwt_settings.refresh_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| ServiceError::Internal(format!("Failed to sign refresh token: {}", e)))?;

    Ok((access_token, refresh_token))
}

#[tracing::instrument(
    name = "Login user attempt",
    skip(login_form, stores, jwt_settings),
    fields(email = %login_form.email)
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    stores: web::Data<AppStores>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, ServiceError> {
    let user = stores
        .users
        .find_by_email(&login_form.email)
        .await?
        .ok_or_else(|| {
            tracing::info!("User not found or invalid credentials");
            ServiceError::InvalidCredentials
        })?;

    if !verify_password(login_form.password.expose_secret(), &user.password_hash) {
        tracing::info!("Invalid password");
        return Err(ServiceError::InvalidCredentials);
    }

    let (access_token, refresh_token) = issue_token_pair(&user, &jwt_settings)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        user: UserResponse::from(&user),
    }))
}

#[tracing::instrument(name = "Refresh access token", skip(refresh_form, stores, jwt_settings))]
pub async fn refresh_token(
    refresh_form: web::Json<RefreshRequest>,
    stores: web::Data<AppStores>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, ServiceError> {
    let token_data = decode::<RefreshClaims>(
        &refresh_form.refresh_token,
        &DecodingKey::from_secret(jwt_settings.refresh_secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        tracing::info!("Invalid refresh token: {:?}", e);
        ServiceError::InvalidCredentials
    })?;

    let user_id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| ServiceError::InvalidCredentials)?;

    // The account may have been deleted since the token was issued
    let user = stores
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ServiceError::InvalidCredentials)?;

    let (access_token, refresh_token) = issue_token_pair(&user, &jwt_settings)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token,
        refresh_token,
        user: UserResponse::from(&user),
    }))
}
