//! Repository for the `payments` table and its storage bucket.
//!
//! Both upload operations are two-phase: write the object to storage,
//! then link its public URL into the payment row. The phases are not
//! atomic — when the row patch fails after a successful upload, the
//! object exists unlinked and the caller must re-fetch the payment to
//! detect it.

use gigram_core::error::CoreError;
use gigram_core::types::DbId;
use validator::Validate;

use crate::client::SupabaseClient;
use crate::error::{DbError, DbResult};
use crate::models::payment::{CreatePayment, Payment, PaymentStatus};
use crate::models::profile::Role;
use crate::storage::UploadFile;

/// Storage bucket holding QR codes and payment proofs.
const PAYMENTS_BUCKET: &str = "payments";

/// Currency applied when the caller does not specify one.
const DEFAULT_CURRENCY: &str = "USD";

/// Embed expression expanding both parties and the job.
const PAYMENT_SELECT: &str = "*,client:profiles!payments_client_id_fkey(*),\
     freelancer:profiles!payments_freelancer_id_fkey(*),job:jobs(*)";

/// Provides payment records and the QR-code proof exchange.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Open a payment record for an accepted application. Status starts
    /// `pending`.
    pub async fn create(client: &SupabaseClient, payment: &CreatePayment) -> DbResult<Payment> {
        payment
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let mut row = payment.clone();
        if row.currency.is_none() {
            row.currency = Some(DEFAULT_CURRENCY.to_string());
        }
        client
            .from("payments")
            .select(PAYMENT_SELECT)
            .insert(&row)
            .await
    }

    /// Upload the freelancer's QR code and link it into the payment,
    /// moving status to `uploaded`.
    ///
    /// The object lands at `qr-codes/{payment_id}.{ext}`, overwriting
    /// any previous upload for the same payment.
    pub async fn upload_qr_code(
        client: &SupabaseClient,
        file: &UploadFile,
        payment_id: DbId,
    ) -> DbResult<Payment> {
        let path = format!("qr-codes/{payment_id}.{}", file.extension());
        Self::upload_and_link(client, file, payment_id, &path, "qr_code_url", PaymentStatus::Uploaded)
            .await
    }

    /// Upload the client's payment proof and link it into the payment,
    /// moving status to `verified`.
    ///
    /// The object lands at `payment-proofs/{payment_id}.{ext}`.
    pub async fn upload_payment_proof(
        client: &SupabaseClient,
        file: &UploadFile,
        payment_id: DbId,
    ) -> DbResult<Payment> {
        let path = format!("payment-proofs/{payment_id}.{}", file.extension());
        Self::upload_and_link(
            client,
            file,
            payment_id,
            &path,
            "payment_proof_url",
            PaymentStatus::Verified,
        )
        .await
    }

    /// Payments involving a user, newest first. `role` selects whether
    /// the user is matched as client or freelancer.
    pub async fn list_by_user(
        client: &SupabaseClient,
        user_id: DbId,
        role: Role,
    ) -> DbResult<Vec<Payment>> {
        let column = match role {
            Role::Client => "client_id",
            Role::Freelancer => "freelancer_id",
        };
        client
            .from("payments")
            .select(PAYMENT_SELECT)
            .eq(column, user_id)
            .order("created_at", false)
            .fetch()
            .await
    }

    /// Set a payment's status, optionally replacing its notes.
    pub async fn set_status(
        client: &SupabaseClient,
        payment_id: DbId,
        status: PaymentStatus,
        notes: Option<&str>,
    ) -> DbResult<Payment> {
        let mut patch = serde_json::json!({ "status": status.as_str() });
        if let Some(notes) = notes {
            patch["notes"] = serde_json::Value::String(notes.to_string());
        }
        let rows: Vec<Payment> = client
            .from("payments")
            .select(PAYMENT_SELECT)
            .eq("id", payment_id)
            .update(&patch)
            .await?;
        rows.into_iter().next().ok_or_else(|| {
            DbError::from(CoreError::NotFound {
                entity: "payment",
                id: payment_id,
            })
        })
    }

    /// Phase one: store the object. Phase two: patch the row with the
    /// public URL and the new status.
    async fn upload_and_link(
        client: &SupabaseClient,
        file: &UploadFile,
        payment_id: DbId,
        path: &str,
        url_column: &str,
        status: PaymentStatus,
    ) -> DbResult<Payment> {
        let storage = client.storage();
        storage.upload(PAYMENTS_BUCKET, path, file).await?;
        let public_url = storage.public_url(PAYMENTS_BUCKET, path);

        let mut patch = serde_json::Map::new();
        patch.insert(url_column.to_string(), serde_json::Value::String(public_url));
        patch.insert(
            "status".to_string(),
            serde_json::Value::String(status.as_str().to_string()),
        );
        let patch = serde_json::Value::Object(patch);
        let rows: Vec<Payment> = client
            .from("payments")
            .select(PAYMENT_SELECT)
            .eq("id", payment_id)
            .update(&patch)
            .await?;
        rows.into_iter().next().ok_or_else(|| {
            DbError::from(CoreError::NotFound {
                entity: "payment",
                id: payment_id,
            })
        })
    }
}
