// cart_service/src/state.rs
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use zcart::CartService;

#[derive(Clone)]
pub struct AppState {
  pub cart_service: Arc<CartService>,
  // Cancelled on shutdown so live observer sessions close promptly
  pub shutdown: CancellationToken,
}
