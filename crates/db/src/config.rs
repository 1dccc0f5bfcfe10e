use gigram_core::error::CoreError;

/// Connection settings for the hosted backend, loaded from environment
/// variables.
///
/// Both values are required; the application cannot start without them.
///
/// | Env Var             | Description                              |
/// |---------------------|------------------------------------------|
/// | `SUPABASE_URL`      | Project base URL, e.g. `https://x.supabase.co` |
/// | `SUPABASE_ANON_KEY` | Anonymous API key sent with every request |
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL without a trailing slash.
    pub url: String,
    /// Anonymous API key.
    pub anon_key: String,
}

impl BackendConfig {
    /// Build a config from explicit values. Trailing slashes on the URL
    /// are stripped so endpoint derivation can always append paths.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Load the config from the environment.
    ///
    /// Returns [`CoreError::Configuration`] if either variable is missing
    /// or empty.
    pub fn from_env() -> Result<Self, CoreError> {
        let url = require_env("SUPABASE_URL")?;
        let anon_key = require_env("SUPABASE_ANON_KEY")?;
        Ok(Self::new(url, anon_key))
    }

    /// Base URL for PostgREST table access.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// Base URL for object storage.
    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.url)
    }

    /// WebSocket URL for the realtime service (http→ws scheme swap).
    pub fn realtime_ws_url(&self) -> String {
        let ws_base = if let Some(rest) = self.url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.url.clone()
        };
        format!("{ws_base}/realtime/v1")
    }
}

fn require_env(name: &'static str) -> Result<String, CoreError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CoreError::Configuration(format!(
            "{name} environment variable is required"
        ))),
    }
}
