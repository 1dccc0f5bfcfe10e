//! Repository for the `messages` table.
//!
//! Live delivery of new messages is handled by the realtime crate; this
//! repository covers the request/response half of chat.

use gigram_core::error::CoreError;
use gigram_core::types::DbId;
use validator::Validate;

use crate::client::SupabaseClient;
use crate::error::DbResult;
use crate::models::message::{Message, NewMessage};

/// Embed expression expanding both conversation participants.
const MESSAGE_SELECT: &str =
    "*,sender:profiles!messages_sender_id_fkey(*),receiver:profiles!messages_receiver_id_fkey(*)";

/// Provides per-job chat history, sending, and read tracking.
pub struct MessageRepo;

impl MessageRepo {
    /// Full conversation for a job in ascending creation order, each
    /// message carrying sender and receiver profiles.
    pub async fn list_for_job(client: &SupabaseClient, job_id: DbId) -> DbResult<Vec<Message>> {
        client
            .from("messages")
            .select(MESSAGE_SELECT)
            .eq("job_id", job_id)
            .order("created_at", true)
            .fetch()
            .await
    }

    /// Append a message. Returns the stored row with both profiles
    /// expanded.
    ///
    /// A subscriber on the same job will also receive this row through
    /// its live channel — callers that optimistically append must
    /// deduplicate by id.
    pub async fn send(client: &SupabaseClient, message: &NewMessage) -> DbResult<Message> {
        message
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        client
            .from("messages")
            .select(MESSAGE_SELECT)
            .insert(message)
            .await
    }

    /// Mark every message in `job_id` addressed to `user_id` as read.
    ///
    /// Idempotent; matching zero messages is a success.
    pub async fn mark_read(client: &SupabaseClient, job_id: DbId, user_id: DbId) -> DbResult<()> {
        client
            .from("messages")
            .eq("job_id", job_id)
            .eq("receiver_id", user_id)
            .update_only(&serde_json::json!({ "is_read": true }))
            .await
    }

    /// Number of unread messages addressed to a user, across all jobs.
    pub async fn unread_count(client: &SupabaseClient, user_id: DbId) -> DbResult<i64> {
        client
            .from("messages")
            .eq("receiver_id", user_id)
            .eq("is_read", false)
            .count()
            .await
    }
}
