//! Payment record models and DTOs.

use gigram_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::job::Job;
use super::profile::Profile;

/// Payment proof-exchange status.
///
/// Forward-only: `pending → uploaded` when the freelancer's QR code is
/// linked, `→ verified` when the client's proof is linked. The final
/// `completed` transition is driven outside this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Uploaded,
    Verified,
    Completed,
}

impl PaymentStatus {
    /// Column value as stored in the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Uploaded => "uploaded",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Completed => "completed",
        }
    }
}

/// A row from the `payments` table.
///
/// `client`, `freelancer`, and `job` are foreign-key expansions, present
/// only when the query requested them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: DbId,
    pub job_id: DbId,
    pub application_id: DbId,
    pub client_id: DbId,
    pub freelancer_id: DbId,
    pub amount: f64,
    pub currency: String,
    pub qr_code_url: Option<String>,
    pub payment_proof_url: Option<String>,
    pub status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub client: Option<Profile>,
    pub freelancer: Option<Profile>,
    pub job: Option<Job>,
}

/// DTO for opening a payment record against an accepted application.
/// Status starts `pending`; currency falls back to USD when omitted.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreatePayment {
    pub job_id: DbId,
    pub application_id: DbId,
    pub client_id: DbId,
    pub freelancer_id: DbId,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}
