// cart_service/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use zcart::CartError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Cart Error: {source}")]
  Cart {
    #[from] // Allows conversion from zcart::CartError
    source: CartError,
  },
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Cart { source } => match source {
        CartError::InvalidInput(m) => HttpResponse::BadRequest().json(json!({"error": m})),
        CartError::ProductNotFound { .. } => HttpResponse::NotFound().json(json!({"error": source.to_string()})),
        CartError::QuantityOverflow { .. } => {
          HttpResponse::UnprocessableEntity().json(json!({"error": source.to_string()}))
        }
        CartError::Storage { .. } => {
          tracing::error!(cart_error_source = ?source, "Cart storage error details");
          HttpResponse::InternalServerError().json(json!({"error": "Cart storage operation failed"}))
        }
      },
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
