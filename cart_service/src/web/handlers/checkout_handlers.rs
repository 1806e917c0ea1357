// cart_service/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;

// --- Handler Implementation ---

#[instrument(name = "handler::checkout", skip(app_state, path), fields(cart_id = %path.as_str()))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  app_state.cart_service.checkout(&cart_id).await?;
  info!("Checkout completed for cart {}.", cart_id);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Checkout completed; cart emptied.",
      "cart_id": cart_id,
  })))
}
