// cart_service/src/web/mod.rs

// Declare child modules
pub mod cors;
pub mod handlers;
pub mod routes;

pub use cors::cors_from_config;
pub use routes::configure_app_routes;
