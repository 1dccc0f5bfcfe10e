//! Telegram Bot API bridge.
//!
//! Covers the bot-side integration of the marketplace: credential
//! validation, bot identity lookup, outbound messages, webhook
//! registration, and verification of the signed launch payload a Mini
//! App receives from the Telegram host.

pub mod api;
pub mod config;
pub mod init_data;

pub use api::{validate_token_format, BotApi, BotInfo, SendMessageOptions, TelegramError};
pub use config::{mini_app_url, TelegramConfig};
pub use init_data::{verify_init_data, InitData, WebAppUser};
