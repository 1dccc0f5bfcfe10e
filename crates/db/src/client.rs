//! HTTP client handle for the hosted backend.
//!
//! [`SupabaseClient`] is an explicitly constructed value passed by
//! reference into every repository call — there is no module-level
//! singleton. The process entry point owns its lifecycle, which also
//! makes substituting a local mock backend in tests trivial.

use gigram_core::error::CoreError;

use crate::config::BackendConfig;
use crate::query::QueryBuilder;
use crate::storage::Storage;

/// Shared connection handle for PostgREST tables and object storage.
///
/// Cheap to clone (the underlying [`reqwest::Client`] is reference
/// counted); clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl SupabaseClient {
    /// Create a client for the given backend.
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling with other HTTP consumers).
    pub fn with_client(http: reqwest::Client, config: BackendConfig) -> Self {
        Self { http, config }
    }

    /// Create a client from `SUPABASE_URL` / `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self, CoreError> {
        Ok(Self::new(BackendConfig::from_env()?))
    }

    /// Start a query against one table.
    pub fn from(&self, table: &'static str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table)
    }

    /// Object-storage operations.
    pub fn storage(&self) -> Storage<'_> {
        Storage::new(self)
    }

    /// Backend connection settings.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Attach the API-key and bearer headers every backend request needs.
    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&self.config.anon_key)
    }
}
