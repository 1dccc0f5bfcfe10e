//! Integration tests for chat message access against a mock backend.

mod support;

use gigram_db::models::NewMessage;
use gigram_db::repositories::MessageRepo;
use support::{message_json, MockBackend};

const JOB_ID: &str = "00000000-0000-0000-0000-000000000010";
const USER_ID: &str = "00000000-0000-0000-0000-0000000000ee";

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_is_scoped_to_the_job_in_ascending_order() {
    let mock = MockBackend::start().await;
    mock.respond_json(
        200,
        serde_json::json!([
            message_json("00000000-0000-0000-0000-000000000031", JOB_ID, "first"),
            message_json("00000000-0000-0000-0000-000000000032", JOB_ID, "second"),
        ]),
    );

    let messages = MessageRepo::list_for_job(&mock.client(), JOB_ID.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "first");

    let request = &mock.requests()[0];
    assert_eq!(request.path, "/rest/v1/messages");
    assert_eq!(request.query_get("job_id"), Some(&*format!("eq.{JOB_ID}")));
    assert_eq!(request.query_get("order"), Some("created_at.asc"));
    let select = request.query_get("select").unwrap();
    assert!(select.contains("sender:profiles!messages_sender_id_fkey(*)"));
    assert!(select.contains("receiver:profiles!messages_receiver_id_fkey(*)"));
}

// ---------------------------------------------------------------------------
// Send
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_inserts_and_returns_the_enriched_row() {
    let mock = MockBackend::start().await;
    mock.respond_json(
        201,
        message_json("00000000-0000-0000-0000-000000000033", JOB_ID, "hello"),
    );

    let message = NewMessage::text(
        JOB_ID.parse().unwrap(),
        USER_ID.parse().unwrap(),
        "00000000-0000-0000-0000-0000000000dd".parse().unwrap(),
        "hello",
    );
    let stored = MessageRepo::send(&mock.client(), &message).await.unwrap();
    assert_eq!(stored.content, "hello");

    let request = &mock.requests()[0];
    assert_eq!(request.method, "POST");
    let body = request.json();
    assert_eq!(body["content"], "hello");
    assert_eq!(body["message_type"], "text");
}

// ---------------------------------------------------------------------------
// Read tracking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mark_read_bulk_updates_only_the_addressed_messages() {
    let mock = MockBackend::start().await;
    mock.respond(200, &[], String::new());

    MessageRepo::mark_read(
        &mock.client(),
        JOB_ID.parse().unwrap(),
        USER_ID.parse().unwrap(),
    )
    .await
    .unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.query_get("job_id"), Some(&*format!("eq.{JOB_ID}")));
    assert_eq!(
        request.query_get("receiver_id"),
        Some(&*format!("eq.{USER_ID}"))
    );
    assert_eq!(request.header("prefer"), Some("return=minimal"));
    assert_eq!(request.json()["is_read"], true);
}

#[tokio::test]
async fn mark_read_with_nothing_to_mark_is_a_success() {
    let mock = MockBackend::start().await;
    // Zero rows matched; the backend still answers success.
    mock.respond(200, &[], String::new());

    let outcome = MessageRepo::mark_read(
        &mock.client(),
        JOB_ID.parse().unwrap(),
        USER_ID.parse().unwrap(),
    )
    .await;
    assert!(outcome.is_ok());
}

#[tokio::test]
async fn unread_count_reads_the_content_range_total() {
    let mock = MockBackend::start().await;
    mock.respond(200, &[("content-range", "*/7")], String::new());

    let count = MessageRepo::unread_count(&mock.client(), USER_ID.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(count, 7);

    let request = &mock.requests()[0];
    assert_eq!(request.method, "HEAD");
    assert_eq!(request.header("prefer"), Some("count=exact"));
    assert_eq!(
        request.query_get("receiver_id"),
        Some(&*format!("eq.{USER_ID}"))
    );
    assert_eq!(request.query_get("is_read"), Some("eq.false"));
}
