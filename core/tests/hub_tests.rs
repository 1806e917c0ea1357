// tests/hub_tests.rs
mod common;

use common::*;
use std::time::{Duration, Instant};
use zcart::{ChangeEvent, ChangeKind, NotificationHub, Product, PublishOutcome};

fn event_for(cart_id: &str, quantity: u32) -> ChangeEvent {
  ChangeEvent::new(cart_id, Product::new("p1", "Calzone", 599), quantity, ChangeKind::Added)
}

#[tokio::test]
async fn test_publish_without_observer_is_noop() {
  setup_tracing();
  let hub = NotificationHub::new();

  assert_eq!(hub.publish("5", event_for("5", 1)), PublishOutcome::NoObserver);
  assert_eq!(hub.active_channels(), 0);
  assert!(!hub.is_attached("5"));

  let stats = hub.stats();
  assert_eq!(stats.published, 1);
  assert_eq!(stats.dropped_no_observer, 1);
  assert_eq!(stats.delivered, 0);
}

#[tokio::test]
async fn test_attached_observer_receives_in_publish_order() {
  setup_tracing();
  let hub = NotificationHub::new();
  let mut handle = hub.attach("5");

  for quantity in 1..=3 {
    assert!(hub.publish("5", event_for("5", quantity)).is_delivered());
  }

  for expected in 1..=3 {
    let event = handle.recv().await.expect("event expected");
    assert_eq!(event.quantity, expected);
  }
  assert!(handle.try_recv().is_none());
}

#[tokio::test]
async fn test_publish_targets_only_its_cart() {
  setup_tracing();
  let hub = NotificationHub::new();
  let mut five = hub.attach("5");
  let mut six = hub.attach("6");

  hub.publish("6", event_for("6", 4));

  assert!(five.try_recv().is_none());
  assert_eq!(six.recv().await.unwrap().cart_id, "6");
}

#[tokio::test]
async fn test_full_queue_drops_without_blocking() {
  setup_tracing();
  let capacity = 10;
  let hub = NotificationHub::with_capacity(capacity);
  let mut handle = hub.attach("5");

  let started = Instant::now();
  let outcomes: Vec<PublishOutcome> = (0..25).map(|q| hub.publish("5", event_for("5", q))).collect();
  assert!(started.elapsed() < Duration::from_secs(1));

  let delivered = outcomes.iter().filter(|o| o.is_delivered()).count();
  let dropped = outcomes.iter().filter(|o| **o == PublishOutcome::QueueFull).count();
  assert_eq!(delivered, capacity);
  assert_eq!(dropped, 25 - capacity);

  // The retained events are the first `capacity`, oldest first.
  let mut retained = Vec::new();
  while let Some(event) = handle.try_recv() {
    retained.push(event.quantity);
  }
  assert_eq!(retained, (0..capacity as u32).collect::<Vec<_>>());
  assert_eq!(hub.stats().dropped_queue_full, (25 - capacity) as u64);
}

#[tokio::test]
async fn test_detach_releases_channel() {
  setup_tracing();
  let hub = NotificationHub::new();
  let handle = hub.attach("5");
  assert!(hub.is_attached("5"));

  hub.detach(handle);
  assert!(!hub.is_attached("5"));
  assert_eq!(hub.publish("5", event_for("5", 1)), PublishOutcome::NoObserver);
  assert_eq!(hub.stats().detached, 1);
}

#[tokio::test]
async fn test_dropping_handle_releases_channel() {
  setup_tracing();
  let hub = NotificationHub::new();
  {
    let _handle = hub.attach("5");
    assert_eq!(hub.active_channels(), 1);
  }
  assert_eq!(hub.active_channels(), 0);
}

#[tokio::test]
async fn test_second_attach_replaces_and_revokes_first() {
  setup_tracing();
  let hub = NotificationHub::new();
  let mut first = hub.attach("5");
  hub.publish("5", event_for("5", 1));

  let mut second = hub.attach("5");
  assert!(first.is_revoked());
  assert!(!second.is_revoked());

  // Revoked handles report detached without draining.
  assert!(first.recv().await.is_none());

  hub.publish("5", event_for("5", 2));
  assert_eq!(second.recv().await.unwrap().quantity, 2);

  let stats = hub.stats();
  assert_eq!(stats.attached, 2);
  assert_eq!(stats.replaced, 1);
}

#[tokio::test]
async fn test_stale_detach_keeps_replacement() {
  setup_tracing();
  let hub = NotificationHub::new();
  let first = hub.attach("5");
  let mut second = hub.attach("5");

  hub.detach(first);
  assert!(hub.is_attached("5"));

  assert!(hub.publish("5", event_for("5", 3)).is_delivered());
  assert_eq!(second.recv().await.unwrap().quantity, 3);
}

#[tokio::test]
async fn test_replaced_waiter_wakes_with_detached_signal() {
  setup_tracing();
  let hub = NotificationHub::new();
  let mut first = hub.attach("5");

  let waiter = tokio::spawn(async move { first.recv().await });
  tokio::time::sleep(Duration::from_millis(20)).await;

  let _second = hub.attach("5");
  let received = tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
  assert!(received.is_none());
}

#[tokio::test]
async fn test_zero_capacity_is_raised_to_one() {
  setup_tracing();
  let hub = NotificationHub::with_capacity(0);
  let _handle = hub.attach("5");

  assert_eq!(hub.capacity(), 1);
  assert!(hub.publish("5", event_for("5", 1)).is_delivered());
  assert_eq!(hub.publish("5", event_for("5", 2)), PublishOutcome::QueueFull);
}
