// zcart/src/session.rs

//! Observer session: the long-lived task behind one live connection watching
//! a cart.
//!
//! Two loops run concurrently on the same task. The reader consumes inbound
//! transport frames and notices disconnects; the forwarder drains the hub
//! handle and writes each event out. Whichever ends first cancels the shared
//! token, which stops the other. The handle is detached through the service
//! on every exit path.

use std::fmt;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{event, instrument, Level};

use crate::hub::ObserverHandle;
use crate::service::CartService;

/// Transport-neutral inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
  Text(String),
  Binary(Vec<u8>),
  Ping(Vec<u8>),
  Pong,
  Close,
}

#[derive(Debug, Error)]
#[error("Observer transport closed: {0}")]
pub struct SinkError(pub String);

/// Outbound half of an observer connection.
///
/// Clones must write to the same connection; the reader answers pings through
/// one clone while the forwarder writes events through another.
#[async_trait(?Send)]
pub trait EventSink: Clone {
  async fn send_text(&mut self, text: String) -> Result<(), SinkError>;

  async fn pong(&mut self, payload: Vec<u8>) -> Result<(), SinkError>;

  async fn close(self);
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
  /// Close frame or end of the inbound stream.
  ClientClosed,
  /// The inbound stream yielded an error.
  TransportError,
  /// Writing to the connection failed.
  SinkFailed,
  /// A newer observer attached to the same cart.
  Replaced,
  /// The caller's shutdown token fired.
  Shutdown,
}

/// Serves a handle from [`CartService::attach_observer`] until the connection
/// closes, the handle is replaced, or `shutdown` is cancelled. Returns the
/// first reason to end.
#[instrument(
  name = "observer_session",
  skip_all,
  fields(cart_id = %handle.cart_id(), observer_id = handle.observer_id())
)]
pub async fn run_observer<S, E, K>(
  service: &CartService,
  handle: ObserverHandle,
  inbound: S,
  sink: K,
  shutdown: CancellationToken,
) -> SessionEnd
where
  S: Stream<Item = Result<InboundFrame, E>> + Unpin,
  E: fmt::Display,
  K: EventSink,
{
  let cancel = shutdown.child_token();
  let mut handle = handle;
  let observer_id = handle.observer_id();
  event!(Level::INFO, observer_id, "Observer session started.");

  let (read_end, forward_end) = tokio::join!(
    read_inbound(inbound, sink.clone(), cancel.clone()),
    forward_events(&mut handle, sink.clone(), cancel.clone()),
  );

  service.detach_observer(handle);
  sink.close().await;

  let end = read_end.or(forward_end).unwrap_or(SessionEnd::Shutdown);
  event!(Level::INFO, observer_id, ?end, "Observer session closed.");
  end
}

async fn read_inbound<S, E, K>(mut inbound: S, mut sink: K, cancel: CancellationToken) -> Option<SessionEnd>
where
  S: Stream<Item = Result<InboundFrame, E>> + Unpin,
  E: fmt::Display,
  K: EventSink,
{
  let end = loop {
    tokio::select! {
      () = cancel.cancelled() => return None,
      frame = inbound.next() => match frame {
        None | Some(Ok(InboundFrame::Close)) => break SessionEnd::ClientClosed,
        Some(Err(err)) => {
          event!(Level::WARN, error = %err, "Observer transport read failed.");
          break SessionEnd::TransportError;
        }
        Some(Ok(InboundFrame::Ping(payload))) => {
          if let Err(err) = sink.pong(payload).await {
            event!(Level::WARN, error = %err, "Failed to answer ping.");
            break SessionEnd::SinkFailed;
          }
        }
        Some(Ok(InboundFrame::Text(text))) => {
          event!(Level::DEBUG, len = text.len(), "Ignoring inbound text frame.");
        }
        Some(Ok(_)) => {}
      }
    }
  };
  cancel.cancel();
  Some(end)
}

async fn forward_events<K>(handle: &mut ObserverHandle, mut sink: K, cancel: CancellationToken) -> Option<SessionEnd>
where
  K: EventSink,
{
  let end = loop {
    tokio::select! {
      () = cancel.cancelled() => return None,
      next = handle.recv() => match next {
        Some(change) => {
          let payload = match change.to_json() {
            Ok(payload) => payload,
            Err(err) => {
              event!(Level::ERROR, error = %err, "Failed to serialize change event; skipping.");
              continue;
            }
          };
          if let Err(err) = sink.send_text(payload).await {
            event!(Level::WARN, error = %err, "Failed to write change event.");
            break SessionEnd::SinkFailed;
          }
          event!(Level::DEBUG, product_id = %change.product_id, quantity = change.quantity, "Observer notified.");
        }
        None => break SessionEnd::Replaced,
      }
    }
  };
  cancel.cancel();
  Some(end)
}
