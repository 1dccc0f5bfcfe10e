//! Object-storage operations (QR codes and payment proofs).
//!
//! Uploads go to deterministic paths and overwrite any existing object
//! (`x-upsert`), so re-uploading for the same payment replaces the old
//! file instead of accumulating copies.

use crate::client::SupabaseClient;
use crate::error::{DbError, DbResult};

/// Cache-control value sent with every upload, in seconds.
const CACHE_CONTROL_SECS: &str = "3600";

/// Fallback MIME type when the caller does not supply one.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// An in-memory file selected by the user for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name; its extension decides the stored object's.
    pub file_name: String,
    /// MIME type, when the picker reported one.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The extension after the last dot, or `"bin"` when there is none.
    pub fn extension(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => "bin",
        }
    }
}

/// Object-storage access scoped to one [`SupabaseClient`].
pub struct Storage<'a> {
    client: &'a SupabaseClient,
}

impl<'a> Storage<'a> {
    pub(crate) fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Upload `file` to `bucket` at `path`, overwriting any existing
    /// object at that path.
    pub async fn upload(&self, bucket: &str, path: &str, file: &UploadFile) -> DbResult<()> {
        let url = format!(
            "{}/object/{bucket}/{path}",
            self.client.config().storage_url()
        );
        let content_type = file
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        let response = self
            .client
            .authorize(self.client.http().post(url))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, CACHE_CONTROL_SECS)
            .header("x-upsert", "true")
            .body(file.bytes.clone())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        Err(DbError::Upload(format!("{status}: {body}")))
    }

    /// Public URL for an object. Derivable offline — no network call.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/object/public/{bucket}/{path}",
            self.client.config().storage_url()
        )
    }
}
