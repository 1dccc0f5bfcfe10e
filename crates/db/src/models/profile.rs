//! Profile entity models and DTOs.

use gigram_core::types::{DbId, TelegramId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Marketplace role. Chosen once at onboarding; there is no transition,
/// which is why the update DTO has no role field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Freelancer,
}

impl Role {
    /// Column value as stored in the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Freelancer => "freelancer",
        }
    }
}

/// A row from the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub telegram_id: TelegramId,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub hourly_rate: Option<f64>,
    pub location: Option<String>,
    pub website: Option<String>,
    /// Ordered portfolio items; free-form JSON owned by the UI layer.
    #[serde(default)]
    pub portfolio: Vec<serde_json::Value>,
    /// Server-computed; there is no client write path for this.
    pub rating: f64,
    pub completed_jobs: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for create-or-replace keyed on `telegram_id`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UpsertProfile {
    pub user_id: DbId,
    pub telegram_id: TelegramId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Partial-merge DTO for profile edits.
///
/// `role` and `rating` are deliberately absent: role is immutable after
/// onboarding and rating is server-computed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<Vec<serde_json::Value>>,
}

/// Search filters for freelancer discovery. An empty set matches all
/// freelancers.
#[derive(Debug, Clone, Default)]
pub struct FreelancerFilters {
    /// Any-overlap match against the profile's skill set.
    pub skills: Vec<String>,
    /// Minimum rating, inclusive.
    pub min_rating: Option<f64>,
    /// Maximum hourly rate, inclusive.
    pub max_rate: Option<f64>,
    /// Case-insensitive substring against name/title/description.
    pub search: Option<String>,
}
