// zcart/src/hub.rs

//! Per-cart notification fan-out.
//!
//! Each cart has at most one attached observer. Its channel is a bounded
//! queue: publishing never blocks, and an event that finds the queue full or
//! no observer attached is dropped. Drops are counted in [`HubStats`] and
//! logged, never returned as errors.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{event, Level};

use crate::model::ChangeEvent;

/// Queue bound per attached observer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Result of [`NotificationHub::publish`]. Only `Delivered` means the event
/// reached a queue; the other variants are expected, silent drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
  Delivered,
  NoObserver,
  QueueFull,
}

impl PublishOutcome {
  pub fn is_delivered(self) -> bool {
    matches!(self, PublishOutcome::Delivered)
  }
}

/// Counter snapshot, see [`NotificationHub::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStats {
  pub published: u64,
  pub delivered: u64,
  pub dropped_no_observer: u64,
  pub dropped_queue_full: u64,
  pub attached: u64,
  pub replaced: u64,
  pub detached: u64,
}

#[derive(Debug, Default)]
struct Counters {
  published: AtomicU64,
  delivered: AtomicU64,
  dropped_no_observer: AtomicU64,
  dropped_queue_full: AtomicU64,
  attached: AtomicU64,
  replaced: AtomicU64,
  detached: AtomicU64,
}

impl Counters {
  fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
  }

  fn snapshot(&self) -> HubStats {
    HubStats {
      published: self.published.load(Ordering::Relaxed),
      delivered: self.delivered.load(Ordering::Relaxed),
      dropped_no_observer: self.dropped_no_observer.load(Ordering::Relaxed),
      dropped_queue_full: self.dropped_queue_full.load(Ordering::Relaxed),
      attached: self.attached.load(Ordering::Relaxed),
      replaced: self.replaced.load(Ordering::Relaxed),
      detached: self.detached.load(Ordering::Relaxed),
    }
  }
}

struct Channel {
  observer_id: u64,
  sender: mpsc::Sender<ChangeEvent>,
  revoked: Arc<AtomicBool>,
}

struct Registry {
  channels: Mutex<HashMap<String, Channel>>,
  capacity: usize,
  next_observer_id: AtomicU64,
  counters: Counters,
}

impl Registry {
  /// Removes the cart's channel only if it still belongs to `observer_id`.
  fn release(&self, cart_id: &str, observer_id: u64) -> bool {
    let mut channels = self.channels.lock();
    match channels.get(cart_id) {
      Some(channel) if channel.observer_id == observer_id => {
        channels.remove(cart_id);
        drop(channels);
        Counters::bump(&self.counters.detached);
        event!(Level::DEBUG, cart_id, observer_id, "Observer detached; channel released.");
        true
      }
      _ => {
        event!(Level::TRACE, cart_id, observer_id, "Stale observer handle; detach is a no-op.");
        false
      }
    }
  }
}

/// Cheap to clone; all clones share one registry.
#[derive(Clone)]
pub struct NotificationHub {
  registry: Arc<Registry>,
}

impl Default for NotificationHub {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for NotificationHub {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NotificationHub")
      .field("capacity", &self.registry.capacity)
      .field("active_channels", &self.active_channels())
      .finish()
  }
}

impl NotificationHub {
  pub fn new() -> Self {
    Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
  }

  /// A capacity of zero is raised to one; tokio channels need room for one event.
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      registry: Arc::new(Registry {
        channels: Mutex::new(HashMap::new()),
        capacity: capacity.max(1),
        next_observer_id: AtomicU64::new(1),
        counters: Counters::default(),
      }),
    }
  }

  pub fn capacity(&self) -> usize {
    self.registry.capacity
  }

  /// Attaches the single observer for `cart_id`, replacing any previous one.
  ///
  /// A replaced handle is revoked: its next [`ObserverHandle::recv`] returns
  /// `None` without draining what was queued for it.
  pub fn attach(&self, cart_id: &str) -> ObserverHandle {
    let registry = &self.registry;
    let observer_id = registry.next_observer_id.fetch_add(1, Ordering::Relaxed);
    let (sender, receiver) = mpsc::channel(registry.capacity);
    let revoked = Arc::new(AtomicBool::new(false));

    let previous = registry.channels.lock().insert(
      cart_id.to_string(),
      Channel {
        observer_id,
        sender,
        revoked: Arc::clone(&revoked),
      },
    );

    Counters::bump(&registry.counters.attached);
    if let Some(previous) = previous {
      previous.revoked.store(true, Ordering::SeqCst);
      Counters::bump(&registry.counters.replaced);
      event!(
        Level::INFO,
        cart_id,
        observer_id,
        replaced_observer_id = previous.observer_id,
        "Observer replaced an existing attachment."
      );
    } else {
      event!(Level::DEBUG, cart_id, observer_id, "Observer attached.");
    }

    ObserverHandle {
      cart_id: cart_id.to_string(),
      observer_id,
      receiver,
      revoked,
      registry: Arc::clone(registry),
      released: false,
    }
  }

  /// Releases the handle's channel. A no-op when the handle was replaced.
  pub fn detach(&self, mut handle: ObserverHandle) {
    handle.release();
  }

  /// Enqueues `event` for the cart's observer without blocking.
  pub fn publish(&self, cart_id: &str, event: ChangeEvent) -> PublishOutcome {
    let registry = &self.registry;
    Counters::bump(&registry.counters.published);

    let mut channels = registry.channels.lock();
    let Some(channel) = channels.get(cart_id) else {
      drop(channels);
      Counters::bump(&registry.counters.dropped_no_observer);
      event!(Level::DEBUG, cart_id, "No observer attached; notification dropped.");
      return PublishOutcome::NoObserver;
    };

    match channel.sender.try_send(event) {
      Ok(()) => {
        drop(channels);
        Counters::bump(&registry.counters.delivered);
        event!(Level::TRACE, cart_id, "Notification queued.");
        PublishOutcome::Delivered
      }
      Err(TrySendError::Full(_)) => {
        let observer_id = channel.observer_id;
        drop(channels);
        Counters::bump(&registry.counters.dropped_queue_full);
        event!(
          Level::WARN,
          cart_id,
          observer_id,
          capacity = registry.capacity,
          "Observer queue full; notification dropped."
        );
        PublishOutcome::QueueFull
      }
      Err(TrySendError::Closed(_)) => {
        // Receiver gone without a detach reaching the registry yet.
        channels.remove(cart_id);
        drop(channels);
        Counters::bump(&registry.counters.dropped_no_observer);
        event!(Level::DEBUG, cart_id, "Observer channel closed; notification dropped.");
        PublishOutcome::NoObserver
      }
    }
  }

  pub fn is_attached(&self, cart_id: &str) -> bool {
    self.registry.channels.lock().contains_key(cart_id)
  }

  pub fn active_channels(&self) -> usize {
    self.registry.channels.lock().len()
  }

  pub fn stats(&self) -> HubStats {
    self.registry.counters.snapshot()
  }
}

/// Receiving end for one attached observer.
///
/// Dropping the handle detaches it, so an observer task that exits on any
/// path (including a panic unwinding through it) releases its channel.
pub struct ObserverHandle {
  cart_id: String,
  observer_id: u64,
  receiver: mpsc::Receiver<ChangeEvent>,
  revoked: Arc<AtomicBool>,
  registry: Arc<Registry>,
  released: bool,
}

impl fmt::Debug for ObserverHandle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ObserverHandle")
      .field("cart_id", &self.cart_id)
      .field("observer_id", &self.observer_id)
      .field("revoked", &self.is_revoked())
      .finish()
  }
}

impl ObserverHandle {
  pub fn cart_id(&self) -> &str {
    &self.cart_id
  }

  pub fn observer_id(&self) -> u64 {
    self.observer_id
  }

  /// True once another observer has attached to the same cart.
  pub fn is_revoked(&self) -> bool {
    self.revoked.load(Ordering::SeqCst)
  }

  /// Next event in publish order. `None` is the detached signal: the handle
  /// was replaced by a newer attach, or its channel was released.
  pub async fn recv(&mut self) -> Option<ChangeEvent> {
    if self.is_revoked() {
      return None;
    }
    let event = self.receiver.recv().await;
    if self.is_revoked() {
      return None;
    }
    event
  }

  /// Non-blocking variant of [`ObserverHandle::recv`]; `None` when nothing is queued.
  pub fn try_recv(&mut self) -> Option<ChangeEvent> {
    if self.is_revoked() {
      return None;
    }
    self.receiver.try_recv().ok()
  }

  fn release(&mut self) {
    if !self.released {
      self.released = true;
      self.receiver.close();
      self.registry.release(&self.cart_id, self.observer_id);
    }
  }
}

impl Drop for ObserverHandle {
  fn drop(&mut self) {
    self.release();
  }
}
