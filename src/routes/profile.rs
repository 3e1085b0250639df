use actix_web::{get, put, web, HttpResponse};

use crate::errors::ServiceError;
use crate::handlers::profile_handler;
use crate::middleware::auth::Claims;
use crate::models::user::UpdateProfileRequest;
use crate::store::AppStores;

#[get("")]
async fn get_profile(
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, ServiceError> {
    profile_handler::get_profile(stores, claims).await
}

#[put("")]
async fn update_profile(
    stores: web::Data<AppStores>,
    claims: web::ReqData<Claims>,
    form: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    profile_handler::update_profile(stores, claims, form).await
}
