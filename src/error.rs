use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::r2d2::PoolError;
use serde_json::json;
use thiserror::Error;

use crate::models::PriceError;

pub const RESTAURANT_NOT_FOUND: &str = "Restaurant not found";
pub const VALIDATION_ERRORS: &str = "validation errors";

/// Failures raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

/// Failures surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", RESTAURANT_NOT_FOUND)]
    RestaurantNotFound,
    /// Bad input, a dangling reference or a rolled back write. Clients are
    /// never told which.
    #[error("{}", VALIDATION_ERRORS)]
    Validation,
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("blocking task failed: {0}")]
    Blocking(#[from] BlockingError),
}

impl ApiError {
    /// Maps a persistence failure. `not_found` is what a missing record means
    /// to the calling route.
    pub fn from_store(e: StoreError, not_found: ApiError) -> Self {
        match e {
            StoreError::NotFound => not_found,
            StoreError::InvalidPrice(_) => ApiError::Validation,
            StoreError::Database(e) => ApiError::Database(e),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RestaurantNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation => StatusCode::BAD_REQUEST,
            ApiError::Pool(_) | ApiError::Database(_) | ApiError::Blocking(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::RestaurantNotFound => json!({ "error": RESTAURANT_NOT_FOUND }),
            ApiError::Validation => json!({ "errors": [VALIDATION_ERRORS] }),
            ApiError::Pool(_) | ApiError::Database(_) | ApiError::Blocking(_) => {
                log::error!("{}", self);
                json!({ "error": "Internal server error" })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn not_found_shape() {
        let (status, body) = body_of(ApiError::RestaurantNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Restaurant not found" }));
    }

    #[actix_web::test]
    async fn validation_shape() {
        let (status, body) = body_of(ApiError::Validation).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "errors": ["validation errors"] }));
    }

    #[test]
    fn store_errors_map_to_api_errors() {
        assert!(matches!(
            ApiError::from_store(StoreError::NotFound, ApiError::RestaurantNotFound),
            ApiError::RestaurantNotFound
        ));
        assert!(matches!(
            ApiError::from_store(StoreError::NotFound, ApiError::Validation),
            ApiError::Validation
        ));
        assert!(matches!(
            ApiError::from_store(
                StoreError::InvalidPrice(PriceError::OutOfRange(31.0)),
                ApiError::RestaurantNotFound
            ),
            ApiError::Validation
        ));
        assert!(matches!(
            ApiError::from_store(
                StoreError::Database(diesel::result::Error::RollbackTransaction),
                ApiError::RestaurantNotFound
            ),
            ApiError::Database(_)
        ));
    }
}
