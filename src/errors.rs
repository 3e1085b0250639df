use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::store::StoreError;

/// Application-level error taxonomy, mapped onto HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Access denied")]
    AccessDenied,

    #[error("{0}")]
    Invalid(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal server error")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::AccessDenied => StatusCode::FORBIDDEN,
            ServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ServiceError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                "Internal server error".to_string()
            }
            ServiceError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}
