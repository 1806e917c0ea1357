// cart_service/src/web/cors.rs

use actix_cors::Cors;

use crate::config::AppConfig;

/// CORS policy for the browser storefront, built from the configured origins.
pub fn cors_from_config(config: &AppConfig) -> Cors {
  let cors = Cors::default()
    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
    .allow_any_header()
    .max_age(3600);

  if config.cors_allowed_origins.iter().any(|origin| origin == "*") {
    return cors.allow_any_origin();
  }
  config
    .cors_allowed_origins
    .iter()
    .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
