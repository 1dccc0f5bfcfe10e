//! Bridge configuration.
//!
//! Every value is optional: a missing bot token degrades the bridge to
//! a stub whose network methods fail with a configuration error, rather
//! than failing application startup.
//!
//! | Env Var                  | Description                            |
//! |--------------------------|----------------------------------------|
//! | `TELEGRAM_BOT_TOKEN`     | Bot API credential (`<id>:<secret>`)   |
//! | `TELEGRAM_BOT_USERNAME`  | Bot username, for the Mini App link    |
//! | `APP_URL`                | Deployed Mini App URL                  |
//! | `WEBHOOK_URL`            | Update-delivery webhook URL            |

/// Bridge settings loaded from the environment.
#[derive(Debug, Clone, Default)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub bot_username: Option<String>,
    pub app_url: Option<String>,
    pub webhook_url: Option<String>,
}

impl TelegramConfig {
    /// Load whatever is present in the environment. Never fails.
    pub fn from_env() -> Self {
        Self {
            bot_token: optional_env("TELEGRAM_BOT_TOKEN"),
            bot_username: optional_env("TELEGRAM_BOT_USERNAME"),
            app_url: optional_env("APP_URL"),
            webhook_url: optional_env("WEBHOOK_URL"),
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Deep link that opens the Mini App from a chat with the bot.
pub fn mini_app_url(bot_username: &str, app_url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(app_url.as_bytes()).collect();
    format!("https://t.me/{bot_username}?start=webapp&web_app={encoded}")
}
