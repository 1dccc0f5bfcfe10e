//! Mini App launch-payload (init data) verification.
//!
//! The Telegram host hands the Mini App a signed query string. Its
//! authenticity check is the standard Web App construction: the `hash`
//! field is an HMAC-SHA256 of the remaining fields — sorted by key and
//! joined as `key=value` lines — keyed with
//! `HMAC-SHA256("WebAppData", bot_token)`. A payload is only trusted
//! after that digest matches, in constant time.

use std::collections::BTreeMap;

use gigram_core::types::TelegramId;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::api::TelegramError;

type HmacSha256 = Hmac<Sha256>;

/// Key-derivation constant fixed by the platform.
const WEB_APP_DATA: &[u8] = b"WebAppData";

/// The authenticated Telegram user carried in the launch payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WebAppUser {
    pub id: TelegramId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
    pub photo_url: Option<String>,
}

impl WebAppUser {
    /// Fixed placeholder identity used outside the Telegram host, where
    /// no launch payload exists.
    pub fn fallback() -> Self {
        Self {
            id: 123_456_789,
            first_name: "Test User".to_string(),
            last_name: None,
            username: Some("testuser".to_string()),
            language_code: None,
            photo_url: None,
        }
    }
}

/// A verified launch payload.
#[derive(Debug, Clone)]
pub struct InitData {
    /// The launching user, when the payload carried one.
    pub user: Option<WebAppUser>,
    /// Unix timestamp at which the payload was issued.
    pub auth_date: Option<i64>,
    /// Session identifier for `answerWebAppQuery`.
    pub query_id: Option<String>,
}

/// Verify a raw init-data query string against the bot credential.
///
/// Returns the parsed payload only when the signature matches; a
/// missing `hash` field, a malformed payload, or a digest mismatch all
/// reject it.
pub fn verify_init_data(init_data: &str, bot_token: &str) -> Result<InitData, TelegramError> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(init_data.as_bytes()) {
        fields.insert(key.into_owned(), value.into_owned());
    }

    let hash = fields
        .remove("hash")
        .ok_or_else(|| TelegramError::InitData("missing hash field".to_string()))?;
    let provided = hex::decode(&hash)
        .map_err(|_| TelegramError::InitData("hash is not hex".to_string()))?;

    // BTreeMap iteration is already key-sorted, which is exactly the
    // order the data-check string requires.
    let data_check_string = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut secret =
        HmacSha256::new_from_slice(WEB_APP_DATA).expect("HMAC accepts any key length");
    secret.update(bot_token.as_bytes());
    let secret = secret.finalize().into_bytes();

    let mut mac = HmacSha256::new_from_slice(&secret).expect("HMAC accepts any key length");
    mac.update(data_check_string.as_bytes());
    mac.verify_slice(&provided)
        .map_err(|_| TelegramError::InitData("signature mismatch".to_string()))?;

    let user = match fields.get("user") {
        Some(raw) => Some(
            serde_json::from_str(raw)
                .map_err(|e| TelegramError::InitData(format!("malformed user field: {e}")))?,
        ),
        None => None,
    };
    let auth_date = fields.get("auth_date").and_then(|v| v.parse().ok());
    let query_id = fields.get("query_id").cloned();

    Ok(InitData {
        user,
        auth_date,
        query_id,
    })
}
