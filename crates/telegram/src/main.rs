//! `gigram-telegram` -- bot webhook registration utility.
//!
//! One-shot setup tool: validates the configured bot credential,
//! confirms the bot's identity against the platform, registers the
//! update webhook, and prints the Mini App deep link.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Description                          |
//! |--------------------------|----------|--------------------------------------|
//! | `TELEGRAM_BOT_TOKEN`     | yes      | Bot API credential                   |
//! | `WEBHOOK_URL`            | no       | Webhook to register; skipped if unset|
//! | `TELEGRAM_BOT_USERNAME`  | no       | Used for the printed deep link       |
//! | `APP_URL`                | no       | Used for the printed deep link       |

use gigram_telegram::{mini_app_url, validate_token_format, BotApi, TelegramConfig};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gigram_telegram=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TelegramConfig::from_env();

    let Some(token) = config.bot_token.clone() else {
        tracing::error!("TELEGRAM_BOT_TOKEN environment variable is required");
        std::process::exit(1);
    };
    if !validate_token_format(&token) {
        tracing::error!("TELEGRAM_BOT_TOKEN does not look like a bot credential");
        std::process::exit(1);
    }

    let bot = BotApi::from_config(&config);

    let info = match bot.get_me().await {
        Ok(info) => info,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch bot identity");
            std::process::exit(1);
        }
    };
    tracing::info!(
        bot_id = info.id,
        username = info.username.as_deref().unwrap_or("<none>"),
        "Authenticated as bot",
    );

    match &config.webhook_url {
        Some(webhook_url) => match bot.set_webhook(webhook_url).await {
            Ok(_) => tracing::info!(url = %webhook_url, "Webhook registered"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to register webhook");
                std::process::exit(1);
            }
        },
        None => tracing::info!("WEBHOOK_URL not set; skipping webhook registration"),
    }

    if let (Some(username), Some(app_url)) = (&config.bot_username, &config.app_url) {
        tracing::info!(url = %mini_app_url(username, app_url), "Mini App deep link");
    }
}
