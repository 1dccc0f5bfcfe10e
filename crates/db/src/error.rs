use gigram_core::error::CoreError;

/// Errors surfaced by the backend access layer.
///
/// Backend-reported failures are passed through unchanged — there is no
/// retry, translation, or local recovery here. Row absence and unique
/// constraint violations are classified into the [`CoreError`] taxonomy;
/// everything else the backend reports becomes [`DbError::Api`].
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level error (not found, conflict, validation, config).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend reported a failure, message passed through verbatim.
    #[error("Backend error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// PostgREST/Postgres error code, when present.
        code: Option<String>,
        /// The backend's own message.
        message: String,
    },

    /// An object-storage write failed.
    #[error("Storage upload failed: {0}")]
    Upload(String),
}

/// Convenience alias for access-layer return values.
pub type DbResult<T> = Result<T, DbError>;
