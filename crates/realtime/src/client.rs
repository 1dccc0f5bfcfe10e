//! WebSocket client for the realtime service.
//!
//! [`RealtimeClient`] holds the connection settings; each call to
//! [`RealtimeClient::subscribe`] opens a dedicated socket, joins one
//! channel, and hands back a [`Subscription`] streaming the matching
//! row inserts. There is no reconnect or retry: a dropped socket simply
//! ends the stream.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use gigram_db::BackendConfig;

use crate::frames::{
    parse_frame, ChangeFilter, PostgresChanges, ReplyPayload, SocketMessage, EVENT_CLOSE,
    EVENT_ERROR, EVENT_POSTGRES_CHANGES, EVENT_REPLY,
};
use crate::subscription::Subscription;

/// Keepalive interval expected by the service.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Errors that can occur when working with the realtime socket.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A protocol-level error on an already-established connection.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Configuration handle for the realtime service.
#[derive(Debug, Clone)]
pub struct RealtimeClient {
    ws_url: String,
    api_key: String,
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

impl RealtimeClient {
    /// Create a client for a realtime endpoint, e.g.
    /// `wss://proj.supabase.co/realtime/v1`.
    pub fn new(ws_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let ws_url = ws_url.into();
        Self {
            ws_url: ws_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Create a client pointing at the same backend as `config`.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.realtime_ws_url(), config.anon_key.clone())
    }

    /// WebSocket base URL.
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Open a live channel for the given row-change filter.
    ///
    /// Each inserted row is deserialized into `T` and delivered in
    /// server arrival order, one at a time, until
    /// [`Subscription::unsubscribe`] is called or the socket drops.
    /// Rows that fail to deserialize are logged and skipped.
    pub async fn subscribe<T>(&self, filter: ChangeFilter) -> Result<Subscription<T>, RealtimeError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = format!(
            "{}/websocket?apikey={}&vsn=1.0.0",
            self.ws_url, self.api_key
        );

        let (mut ws_stream, _response) = connect_async(&url).await.map_err(|e| {
            RealtimeError::Connection(format!(
                "Failed to connect to realtime service at {}: {e}",
                self.ws_url
            ))
        })?;

        let topic = filter.topic();
        let join = SocketMessage::join(&topic, &filter, 1);
        send_frame(&mut ws_stream, &join).await?;

        tracing::info!(topic = %topic, "Joined realtime channel");

        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let task = tokio::spawn(run_channel(ws_stream, topic, tx, token.clone()));

        Ok(Subscription::new(rx, token, task))
    }
}

/// Serialize and send one frame.
async fn send_frame(ws_stream: &mut WsStream, frame: &SocketMessage) -> Result<(), RealtimeError> {
    let text = serde_json::to_string(frame)
        .map_err(|e| RealtimeError::Protocol(format!("Failed to encode frame: {e}")))?;
    ws_stream
        .send(WsMessage::Text(text))
        .await
        .map_err(|e| RealtimeError::Connection(format!("WebSocket send failed: {e}")))
}

/// Drive one joined channel until teardown or socket loss.
///
/// Sends heartbeats on schedule, forwards matching inserts into `tx`,
/// and on cancellation sends `phx_leave` before closing the socket.
async fn run_channel<T>(
    mut ws_stream: WsStream,
    topic: String,
    tx: mpsc::UnboundedSender<T>,
    token: CancellationToken,
) where
    T: DeserializeOwned + Send + 'static,
{
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    // The first tick completes immediately; an early heartbeat is harmless.
    let mut reference: u64 = 1;

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                reference += 1;
                let leave = SocketMessage::leave(&topic, reference);
                if let Err(e) = send_frame(&mut ws_stream, &leave).await {
                    tracing::debug!(topic = %topic, error = %e, "Leave frame not delivered");
                }
                let _ = ws_stream.close(None).await;
                tracing::info!(topic = %topic, "Left realtime channel");
                break;
            }
            _ = heartbeat.tick() => {
                reference += 1;
                let frame = SocketMessage::heartbeat(reference);
                if let Err(e) = send_frame(&mut ws_stream, &frame).await {
                    tracing::warn!(topic = %topic, error = %e, "Heartbeat failed, closing channel");
                    break;
                }
            }
            incoming = ws_stream.next() => match incoming {
                Some(Ok(WsMessage::Text(text))) => handle_text_frame(&topic, &text, &tx),
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => {
                    // Handled automatically by tungstenite.
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    tracing::info!(topic = %topic, ?frame, "Realtime socket closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!(topic = %topic, error = %e, "WebSocket receive error");
                    break;
                }
                None => break,
            }
        }
    }
}

/// Dispatch a single incoming text frame.
fn handle_text_frame<T>(topic: &str, text: &str, tx: &mpsc::UnboundedSender<T>)
where
    T: DeserializeOwned,
{
    let frame = match parse_frame(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(topic = %topic, error = %e, raw_frame = %text, "Unparseable frame");
            return;
        }
    };

    match frame.event.as_str() {
        EVENT_POSTGRES_CHANGES => {
            if frame.topic != topic {
                tracing::warn!(
                    topic = %topic,
                    frame_topic = %frame.topic,
                    "Dropping row change addressed to another channel",
                );
                return;
            }
            let changes: PostgresChanges = match serde_json::from_value(frame.payload) {
                Ok(changes) => changes,
                Err(e) => {
                    tracing::warn!(topic = %topic, error = %e, "Malformed postgres_changes payload");
                    return;
                }
            };
            match serde_json::from_value::<T>(changes.data.record) {
                Ok(row) => {
                    // The receiver is gone only during teardown; nothing to do then.
                    let _ = tx.send(row);
                }
                Err(e) => {
                    tracing::warn!(
                        topic = %topic,
                        table = %changes.data.table,
                        error = %e,
                        "Skipping row that failed to deserialize",
                    );
                }
            }
        }
        EVENT_REPLY => {
            if let Ok(reply) = serde_json::from_value::<ReplyPayload>(frame.payload) {
                tracing::debug!(topic = %topic, status = %reply.status, "Channel reply");
            }
        }
        EVENT_CLOSE | EVENT_ERROR => {
            tracing::warn!(topic = %topic, event = %frame.event, "Channel terminated by server");
        }
        other => {
            tracing::trace!(topic = %topic, event = %other, "Ignoring frame");
        }
    }
}
