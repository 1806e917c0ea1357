// cart_service/src/web/handlers/observer_handlers.rs

//! WebSocket endpoint for live cart observers.

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{Message, Session};
use async_trait::async_trait;
use futures_util::StreamExt;
use tracing::{info, instrument};
use zcart::{run_observer, EventSink, InboundFrame, SinkError};

use crate::errors::AppError;
use crate::state::AppState;

/// Outbound half of an actix-ws connection.
#[derive(Clone)]
struct WsEventSink {
  session: Session,
}

#[async_trait(?Send)]
impl EventSink for WsEventSink {
  async fn send_text(&mut self, text: String) -> Result<(), SinkError> {
    self.session.text(text).await.map_err(|e| SinkError(format!("{:?}", e)))
  }

  async fn pong(&mut self, payload: Vec<u8>) -> Result<(), SinkError> {
    self.session.pong(&payload).await.map_err(|e| SinkError(format!("{:?}", e)))
  }

  async fn close(self) {
    // Already closed by the peer in the common case.
    let _ = self.session.close(None).await;
  }
}

fn to_frame(message: Message) -> InboundFrame {
  match message {
    Message::Text(text) => InboundFrame::Text(text.to_string()),
    Message::Binary(bytes) => InboundFrame::Binary(bytes.to_vec()),
    Message::Ping(bytes) => InboundFrame::Ping(bytes.to_vec()),
    Message::Close(_) => InboundFrame::Close,
    _ => InboundFrame::Pong,
  }
}

#[instrument(name = "handler::observe_cart", skip(app_state, req, body, path), fields(cart_id = %path.as_str()))]
pub async fn observe_cart_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Payload,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let (response, session, msg_stream) =
    actix_ws::handle(&req, body).map_err(|e| AppError::Validation(format!("WebSocket upgrade failed: {}", e)))?;

  let cart_service = app_state.cart_service.clone();
  let handle = cart_service.attach_observer(&cart_id)?;
  info!("WebSocket connection for cart {}", cart_id);

  let shutdown = app_state.shutdown.clone();
  let inbound = Box::pin(msg_stream.map(|item| item.map(to_frame).map_err(|e| e.to_string())));

  // The message stream is !Send, so the session runs on the worker's local set.
  actix_web::rt::spawn(async move {
    run_observer(&cart_service, handle, inbound, WsEventSink { session }, shutdown).await;
  });

  Ok(response)
}
