// cart_service/src/main.rs

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use cart_service::config::AppConfig;
use cart_service::web::{configure_app_routes, cors_from_config};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting cart service...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };
  let server_address = app_config.bind_address();

  let app_state = match cart_service::init_state(&app_config).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize application state.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  // Close live observer sessions on Ctrl-C so graceful shutdown is not held open.
  let shutdown = app_state.shutdown.clone();
  actix_web::rt::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      tracing::info!("Shutdown signal received; closing observer sessions.");
      shutdown.cancel();
    }
  });

  tracing::info!("Attempting to bind server to {}...", server_address);
  let shutdown = app_state.shutdown.clone();

  let result = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(cors_from_config(&app_config))
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await;

  shutdown.cancel();
  tracing::info!("Cart service stopped.");
  result
}
