//! Application (freelancer bid) models and DTOs.

use gigram_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::job::Job;
use super::profile::Profile;

/// Application lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// Column value as stored in the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// A row from the `applications` table.
///
/// `freelancer` and `job` are foreign-key expansions, present only when
/// the query requested them. `job` is boxed to break the
/// job/application type cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: DbId,
    pub job_id: DbId,
    pub freelancer_id: DbId,
    pub proposal: String,
    pub bid_amount: f64,
    pub estimated_duration: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub freelancer: Option<Profile>,
    pub job: Option<Box<Job>>,
}

/// DTO for submitting a bid. Status starts `pending` server-side.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateApplication {
    pub job_id: DbId,
    pub freelancer_id: DbId,
    #[validate(length(min = 1))]
    pub proposal: String,
    #[validate(range(min = 0.01))]
    pub bid_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
}
