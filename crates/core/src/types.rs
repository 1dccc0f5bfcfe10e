/// All backend row identifiers are server-assigned UUIDs.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC, assigned by the backend.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Telegram user identifiers are 64-bit integers.
pub type TelegramId = i64;
