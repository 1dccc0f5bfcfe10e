//! Chat message models and DTOs.

use gigram_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::profile::Profile;

/// Payload kind of a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    File,
}

/// A row from the `messages` table.
///
/// `sender` and `receiver` are foreign-key expansions, present only when
/// the query requested them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: DbId,
    pub job_id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub content: String,
    pub message_type: MessageType,
    pub file_url: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub sender: Option<Profile>,
    pub receiver: Option<Profile>,
}

/// DTO for appending a message to a job's conversation.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewMessage {
    pub job_id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    #[validate(length(min = 1))]
    pub content: String,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl NewMessage {
    /// A plain text message, the common case.
    pub fn text(
        job_id: DbId,
        sender_id: DbId,
        receiver_id: DbId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            job_id,
            sender_id,
            receiver_id,
            content: content.into(),
            message_type: MessageType::Text,
            file_url: None,
        }
    }
}
