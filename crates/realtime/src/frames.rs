//! Wire frames for the realtime socket.
//!
//! The service speaks a Phoenix-channel-style protocol: every frame is
//! a JSON object `{"topic", "event", "payload", "ref"}`. This module
//! deserializes incoming frames, builds the outgoing control frames
//! (join/leave/heartbeat), and types the `postgres_changes` payload that
//! carries inserted rows.

use serde::{Deserialize, Serialize};

/// Channel lifecycle and protocol event names.
pub const EVENT_JOIN: &str = "phx_join";
pub const EVENT_REPLY: &str = "phx_reply";
pub const EVENT_LEAVE: &str = "phx_leave";
pub const EVENT_CLOSE: &str = "phx_close";
pub const EVENT_ERROR: &str = "phx_error";
pub const EVENT_HEARTBEAT: &str = "heartbeat";
pub const EVENT_POSTGRES_CHANGES: &str = "postgres_changes";

/// Reserved topic for connection-level heartbeats.
pub const TOPIC_PHOENIX: &str = "phoenix";

/// One frame on the socket, either direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketMessage {
    pub topic: String,
    pub event: String,
    pub payload: serde_json::Value,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

impl SocketMessage {
    /// Join frame subscribing `topic` to the given row-change filter.
    pub fn join(topic: &str, filter: &ChangeFilter, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: EVENT_JOIN.to_string(),
            payload: serde_json::json!({
                "config": {
                    "broadcast": { "self": false },
                    "presence": { "key": "" },
                    "postgres_changes": [filter],
                }
            }),
            reference: Some(reference.to_string()),
        }
    }

    /// Leave frame releasing `topic`.
    pub fn leave(topic: &str, reference: u64) -> Self {
        Self {
            topic: topic.to_string(),
            event: EVENT_LEAVE.to_string(),
            payload: serde_json::Value::Object(Default::default()),
            reference: Some(reference.to_string()),
        }
    }

    /// Connection keepalive frame.
    pub fn heartbeat(reference: u64) -> Self {
        Self {
            topic: TOPIC_PHOENIX.to_string(),
            event: EVENT_HEARTBEAT.to_string(),
            payload: serde_json::Value::Object(Default::default()),
            reference: Some(reference.to_string()),
        }
    }
}

/// Parse a text frame into a [`SocketMessage`].
///
/// Returns `Err` for malformed JSON. Callers should log and continue —
/// an unparseable frame is never fatal to the subscription.
pub fn parse_frame(text: &str) -> Result<SocketMessage, serde_json::Error> {
    serde_json::from_str(text)
}

/// Row-change kind, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeEvent {
    Insert,
    Update,
    Delete,
}

/// A row-change subscription: event kind, schema, table, and an optional
/// equality filter on one column.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeFilter {
    pub event: ChangeEvent,
    pub schema: String,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ChangeFilter {
    /// Subscribe to inserts on a table in the public schema.
    pub fn inserts(table: impl Into<String>) -> Self {
        Self {
            event: ChangeEvent::Insert,
            schema: "public".to_string(),
            table: table.into(),
            filter: None,
        }
    }

    /// Restrict to rows where `column` equals `value`.
    pub fn with_eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filter = Some(format!("{column}=eq.{}", value.to_string()));
        self
    }

    /// Channel topic for this subscription, unique per table + filter.
    pub fn topic(&self) -> String {
        match &self.filter {
            Some(filter) => format!("realtime:{}:{filter}", self.table),
            None => format!("realtime:{}", self.table),
        }
    }
}

/// Payload of a `postgres_changes` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct PostgresChanges {
    pub data: ChangeData,
}

/// The row change itself.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeData {
    pub schema: String,
    pub table: String,
    #[serde(rename = "type")]
    pub event: ChangeEvent,
    /// The affected row, as stored.
    pub record: serde_json::Value,
    pub commit_timestamp: Option<String>,
}

/// Payload of a `phx_reply` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyPayload {
    pub status: String,
    #[serde(default)]
    pub response: serde_json::Value,
}
