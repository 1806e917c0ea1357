// cart_service/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://zcart.db?mode=rwc";

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Bounded queue size per live cart observer
  pub notify_queue_capacity: usize,

  // Optional: insert sample catalog products on startup
  pub seed_db: bool,

  // Origins allowed to call the API from a browser; "*" allows any
  pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 3333,
      database_url: DEFAULT_DATABASE_URL.to_string(),
      notify_queue_capacity: zcart::DEFAULT_QUEUE_CAPACITY,
      seed_db: false,
      cors_allowed_origins: vec!["*".to_string()],
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; unset variables fall back to defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let server_host = lookup("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = match lookup("SERVER_PORT") {
      Some(raw) => raw
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT '{}': {}", raw, e)))?,
      None => defaults.server_port,
    };
    let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);

    let notify_queue_capacity = match lookup("NOTIFY_QUEUE_CAPACITY") {
      Some(raw) => raw
        .parse::<usize>()
        .map_err(|e| AppError::Config(format!("Invalid NOTIFY_QUEUE_CAPACITY '{}': {}", raw, e)))?,
      None => defaults.notify_queue_capacity,
    };
    if notify_queue_capacity == 0 {
      return Err(AppError::Config("NOTIFY_QUEUE_CAPACITY must be at least 1".to_string()));
    }

    let seed_db = match lookup("SEED_DB") {
      Some(raw) => raw
        .parse::<bool>()
        .map_err(|e| AppError::Config(format!("Invalid SEED_DB value '{}': {}", raw, e)))?,
      None => defaults.seed_db,
    };

    let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
      Some(raw) => {
        let origins: Vec<String> = raw
          .split(',')
          .map(str::trim)
          .filter(|origin| !origin.is_empty())
          .map(str::to_string)
          .collect();
        if origins.is_empty() {
          return Err(AppError::Config("CORS_ALLOWED_ORIGINS must name at least one origin".to_string()));
        }
        origins
      }
      None => defaults.cors_allowed_origins,
    };

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      notify_queue_capacity,
      seed_db,
      cors_allowed_origins,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| map.get(name).cloned()
  }

  #[test]
  fn defaults_when_unset() {
    let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:3333");
    assert_eq!(config.notify_queue_capacity, 10);
    assert!(!config.seed_db);
    assert_eq!(config.cors_allowed_origins, vec!["*".to_string()]);
  }

  #[test]
  fn reads_overrides() {
    let config = AppConfig::from_lookup(lookup_from(&[
      ("SERVER_PORT", "8081"),
      ("DATABASE_URL", "sqlite::memory:"),
      ("NOTIFY_QUEUE_CAPACITY", "32"),
      ("SEED_DB", "true"),
      ("CORS_ALLOWED_ORIGINS", "http://localhost:3000, https://shop.example.com"),
    ]))
    .unwrap();
    assert_eq!(config.server_port, 8081);
    assert_eq!(config.database_url, "sqlite::memory:");
    assert_eq!(config.notify_queue_capacity, 32);
    assert!(config.seed_db);
    assert_eq!(
      config.cors_allowed_origins,
      vec!["http://localhost:3000".to_string(), "https://shop.example.com".to_string()]
    );
  }

  #[test]
  fn rejects_malformed_values() {
    assert!(matches!(
      AppConfig::from_lookup(lookup_from(&[("SERVER_PORT", "http")])),
      Err(AppError::Config(_))
    ));
    assert!(matches!(
      AppConfig::from_lookup(lookup_from(&[("NOTIFY_QUEUE_CAPACITY", "0")])),
      Err(AppError::Config(_))
    ));
    assert!(matches!(
      AppConfig::from_lookup(lookup_from(&[("SEED_DB", "yes")])),
      Err(AppError::Config(_))
    ));
    assert!(matches!(
      AppConfig::from_lookup(lookup_from(&[("CORS_ALLOWED_ORIGINS", " , ")])),
      Err(AppError::Config(_))
    ));
  }
}
