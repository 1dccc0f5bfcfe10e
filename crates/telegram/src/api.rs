//! REST client for the Telegram Bot API.
//!
//! All methods are `POST https://api.telegram.org/bot<token>/<method>`
//! and answer with a uniform `{ok, result | description}` envelope; a
//! non-ok envelope surfaces as [`TelegramError::Api`] carrying the
//! platform's description.

use std::sync::LazyLock;

use gigram_core::error::CoreError;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::TelegramConfig;

/// Bot API host. Overridable per client for tests.
const API_BASE: &str = "https://api.telegram.org";

/// Update kinds the webhook subscribes to.
const ALLOWED_UPDATES: [&str; 3] = ["message", "callback_query", "web_app_data"];

/// Structural shape of a bot credential: numeric bot id, a colon, and a
/// 35-character secret.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+:[A-Za-z0-9_-]{35}$").expect("valid regex"));

/// Check a bot credential's format without contacting the network.
pub fn validate_token_format(token: &str) -> bool {
    TOKEN_RE.is_match(token)
}

/// Errors from the Bot API bridge.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// A domain-level error, e.g. no credential configured.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform answered `ok: false`.
    #[error("Telegram API error: {description}")]
    Api { description: String },

    /// The Mini App launch payload failed verification.
    #[error("Launch payload rejected: {0}")]
    InitData(String),
}

/// Uniform Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// The bot's own identity, from `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotInfo {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

/// A delivered message, from `sendMessage`. Only the id matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

/// One polled update, from `getUpdates`. The update body stays raw JSON
/// — this layer routes, it does not interpret.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(flatten)]
    pub payload: serde_json::Value,
}

/// Optional knobs for `sendMessage`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SendMessageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(flatten)]
    options: SendMessageOptions,
}

#[derive(Serialize)]
struct SetWebhookRequest<'a> {
    url: &'a str,
    allowed_updates: [&'static str; 3],
}

#[derive(Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
}

/// HTTP client for one bot credential.
///
/// Constructed explicitly and passed by reference to consumers; a
/// missing credential turns every network method into a configuration
/// error instead of a startup failure.
#[derive(Debug, Clone)]
pub struct BotApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BotApi {
    /// Create a client, possibly without a credential.
    pub fn new(token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: API_BASE.to_string(),
            token,
        }
    }

    /// Create a client from the bridge configuration.
    pub fn from_config(config: &TelegramConfig) -> Self {
        Self::new(config.bot_token.clone())
    }

    /// Point the client at a different host (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Whether a credential is configured.
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Fetch the bot's identity.
    pub async fn get_me(&self) -> Result<BotInfo, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Send a text message to a chat.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: Option<SendMessageOptions>,
    ) -> Result<SentMessage, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text,
            options: options.unwrap_or_default(),
        };
        self.call("sendMessage", &request).await
    }

    /// Register the update-delivery webhook, scoped to message,
    /// callback-query, and web-app-data updates.
    pub async fn set_webhook(&self, url: &str) -> Result<bool, TelegramError> {
        let request = SetWebhookRequest {
            url,
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call("setWebhook", &request).await
    }

    /// Poll pending updates, optionally starting after `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        self.call("getUpdates", &GetUpdatesRequest { offset }).await
    }

    /// The configured credential, or a configuration error.
    pub(crate) fn token(&self) -> Result<&str, TelegramError> {
        self.token.as_deref().ok_or_else(|| {
            CoreError::Configuration("No Telegram bot token configured".to_string()).into()
        })
    }

    /// POST one Bot API method and unwrap the response envelope.
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.token()?;
        let url = format!("{}/bot{token}/{method}", self.base_url);

        let response = self.http.post(url).json(body).send().await?;
        let envelope: ApiEnvelope<T> = response.json().await?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        envelope.result.ok_or(TelegramError::Api {
            description: "ok response without a result".to_string(),
        })
    }
}
