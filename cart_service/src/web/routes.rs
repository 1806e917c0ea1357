// cart_service/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, checkout_handlers, observer_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function will be called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/cart/{cart_id}")
        .route("", web::get().to(cart_handlers::get_cart_handler))
        .route("/ws", web::get().to(observer_handlers::observe_cart_handler))
        .route("/checkout", web::post().to(checkout_handlers::checkout_handler))
        .route("/products", web::post().to(cart_handlers::update_products_handler))
        .route(
          "/products/{product_id}",
          web::post().to(cart_handlers::add_product_handler),
        ),
    );
}
