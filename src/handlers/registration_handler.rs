use actix_web::{web, HttpResponse};
use chrono::Utc;
use secrecy::ExposeSecret;
use serde_json::json;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::user::{RegistrationRequest, User, UserResponse, UserRole};
use crate::store::AppStores;
use crate::utils::password::hash_password;

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show the password
    skip(user_form, stores),
    fields(email = %user_form)
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    stores: web::Data<AppStores>,
) -> Result<HttpResponse, ServiceError> {
    validate_registration(&user_form)?;

    if stores
        .users
        .find_by_email(&user_form.email)
        .await?
        .is_some()
    {
        return Err(ServiceError::Invalid("Email already in use".into()));
    }

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4(),
        email: user_form.email.clone(),
        password_hash: hash_password(user_form.password.expose_secret()),
        role: UserRole::User,
        created_at: now,
        updated_at: now,
    };
    stores.users.insert(&user).await?;

    tracing::info!("New user registered: {}", user.id);
    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "user": UserResponse::from(&user),
    })))
}

fn validate_registration(form: &RegistrationRequest) -> Result<(), ServiceError> {
    let email = form.email.trim();
    if email.is_empty() || !email.contains('@') || email.len() > 255 {
        return Err(ServiceError::Invalid("A valid email is required".into()));
    }
    if form.password.expose_secret().len() < 6 {
        return Err(ServiceError::Invalid(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}
