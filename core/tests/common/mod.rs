// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};
use tracing::Level;
use zcart::{
  CartError, CartProductRow, CartResult, CartService, CartStore, EventSink, InMemoryCartStore, InMemoryCatalog,
  NotificationHub, Product, SinkError,
};

// --- Catalog Fixtures ---
pub fn sample_products() -> Vec<Product> {
  vec![
    Product::new("p1", "Calzone", 599).with_description("Folded pizza"),
    Product::new("p2", "Pao de Batata", 299).with_image_url("https://example.com/pao.png"),
    Product::new("p3", "Coxinha", 450),
  ]
}

pub fn sample_catalog() -> Arc<InMemoryCatalog> {
  Arc::new(InMemoryCatalog::with_products(sample_products()))
}

pub struct TestService {
  pub service: CartService,
  pub store: Arc<InMemoryCartStore>,
  pub catalog: Arc<InMemoryCatalog>,
  pub hub: NotificationHub,
}

pub fn service_with_capacity(capacity: usize) -> TestService {
  let store = Arc::new(InMemoryCartStore::new());
  let catalog = sample_catalog();
  let hub = NotificationHub::with_capacity(capacity);
  let service = CartService::new(store.clone(), catalog.clone(), hub.clone());
  TestService {
    service,
    store,
    catalog,
    hub,
  }
}

pub fn test_service() -> TestService {
  service_with_capacity(zcart::DEFAULT_QUEUE_CAPACITY)
}

// --- Store that fails on demand ---
#[derive(Default)]
pub struct FlakyStore {
  pub inner: InMemoryCartStore,
  pub fail_reads: AtomicBool,
  pub fail_writes: AtomicBool,
}

impl FlakyStore {
  fn check(flag: &AtomicBool, op: &str) -> CartResult<()> {
    if flag.load(Ordering::SeqCst) {
      return Err(CartError::storage(anyhow::anyhow!("simulated {} failure", op)));
    }
    Ok(())
  }
}

#[async_trait]
impl CartStore for FlakyStore {
  async fn get_row(&self, cart_id: &str, product_id: &str) -> CartResult<Option<CartProductRow>> {
    Self::check(&self.fail_reads, "read")?;
    self.inner.get_row(cart_id, product_id).await
  }

  async fn set_quantity(&self, cart_id: &str, product_id: &str, quantity: u32) -> CartResult<()> {
    Self::check(&self.fail_writes, "write")?;
    self.inner.set_quantity(cart_id, product_id, quantity).await
  }

  async fn delete_row(&self, cart_id: &str, product_id: &str) -> CartResult<()> {
    Self::check(&self.fail_writes, "write")?;
    self.inner.delete_row(cart_id, product_id).await
  }

  async fn list_rows(&self, cart_id: &str) -> CartResult<Vec<CartProductRow>> {
    Self::check(&self.fail_reads, "read")?;
    self.inner.list_rows(cart_id).await
  }

  async fn delete_cart(&self, cart_id: &str) -> CartResult<()> {
    Self::check(&self.fail_writes, "write")?;
    self.inner.delete_cart(cart_id).await
  }
}

// --- Recording sink for observer sessions ---
#[derive(Clone, Default)]
pub struct RecordingSink {
  pub sent: Arc<Mutex<Vec<String>>>,
  pub pongs: Arc<Mutex<Vec<Vec<u8>>>>,
  pub closed: Arc<AtomicBool>,
  pub fail_sends: Arc<AtomicBool>,
}

impl RecordingSink {
  pub fn sent_json(&self) -> Vec<serde_json::Value> {
    self
      .sent
      .lock()
      .iter()
      .map(|s| serde_json::from_str(s).expect("sink received invalid json"))
      .collect()
  }
}

#[async_trait(?Send)]
impl EventSink for RecordingSink {
  async fn send_text(&mut self, text: String) -> Result<(), SinkError> {
    if self.fail_sends.load(Ordering::SeqCst) {
      return Err(SinkError("broken pipe".to_string()));
    }
    self.sent.lock().push(text);
    Ok(())
  }

  async fn pong(&mut self, payload: Vec<u8>) -> Result<(), SinkError> {
    self.pongs.lock().push(payload);
    Ok(())
  }

  async fn close(self) {
    self.closed.store(true, Ordering::SeqCst);
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
