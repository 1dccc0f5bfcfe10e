//! Realtime client for the backend's row-change notification service.
//!
//! Provides typed frame parsing for the Phoenix-style channel protocol,
//! a WebSocket client that turns a row-insert subscription into a
//! cancellable event stream, and the chat-specific convenience wrapper
//! the marketplace UI consumes.

pub mod client;
pub mod frames;
pub mod subscription;

pub use client::{RealtimeClient, RealtimeError};
pub use frames::{ChangeEvent, ChangeFilter};
pub use subscription::Subscription;

use gigram_core::types::DbId;
use gigram_db::models::Message;

/// Subscribe to new chat messages on one job.
///
/// Delivers every message row inserted for `job_id`, in server arrival
/// order, until the subscription is torn down. A message the caller just
/// sent also arrives here — deduplicate by id when appending
/// optimistically.
pub async fn subscribe_job_messages(
    client: &RealtimeClient,
    job_id: DbId,
) -> Result<Subscription<Message>, RealtimeError> {
    let filter = ChangeFilter::inserts("messages").with_eq("job_id", job_id);
    client.subscribe(filter).await
}
