// cart_service/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use zcart::{CartAction, PublishOutcome, QuantityUpdate};

use crate::errors::AppError;
use crate::state::AppState;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct UpdateProductsRequestPayload {
  pub product_id: String,
  pub amount: u32,
  // Kept as a string so an unknown action surfaces as a validation error, not a parse error.
  pub action: String,
}

fn update_response(update: &QuantityUpdate) -> HttpResponse {
  HttpResponse::Ok().json(json!({
      "cart_id": update.event.cart_id,
      "product_id": update.event.product_id,
      "quantity": update.event.quantity,
      "event": update.event.kind,
      "notified": update.delivery.map_or(false, PublishOutcome::is_delivered),
  }))
}

// --- Handler Implementation ---

#[instrument(name = "handler::get_cart", skip(app_state, path), fields(cart_id = %path.as_str()))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let cart = app_state.cart_service.get_cart(&cart_id).await?;
  info!("Cart {} has {} line(s).", cart_id, cart.products.len());
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
    name = "handler::update_products",
    skip(app_state, path, req_payload),
    fields(cart_id = %path.as_str(), product_id = %req_payload.product_id, amount = %req_payload.amount)
)]
pub async fn update_products_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  req_payload: web::Json<UpdateProductsRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let payload = req_payload.into_inner();
  let action: CartAction = payload.action.parse()?;

  let update = app_state
    .cart_service
    .update_quantity(&cart_id, &payload.product_id, payload.amount, action)
    .await?;

  info!(
    "Cart {} now holds {} of product {} after '{}'.",
    cart_id,
    update.quantity(),
    payload.product_id,
    action
  );
  Ok(update_response(&update))
}

/// Adds a single unit of the product named in the path.
#[instrument(name = "handler::add_product", skip(app_state, path))]
pub async fn add_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
  let (cart_id, product_id) = path.into_inner();
  let update = app_state
    .cart_service
    .update_quantity(&cart_id, &product_id, 1, CartAction::Add)
    .await?;
  Ok(update_response(&update))
}
