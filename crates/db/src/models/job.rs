//! Job entity models and DTOs.

use chrono::NaiveDate;
use gigram_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::application::Application;
use super::profile::Profile;

/// Category value meaning "do not filter by category".
pub const ALL_CATEGORIES: &str = "All Categories";

/// How the budget is quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    Fixed,
    Hourly,
}

/// Job lifecycle status.
///
/// Jobs are created `open` by the backend. The only transition driven by
/// this layer is `open → in_progress`, as a side effect of accepting an
/// application; `completed`/`cancelled` are reachable only through the
/// generic update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl JobStatus {
    /// Column value as stored in the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

/// A row from the `jobs` table.
///
/// `client` and `applications` are foreign-key expansions, present only
/// when the query requested them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: DbId,
    pub client_id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget_type: BudgetType,
    pub budget_amount: f64,
    pub currency: String,
    #[serde(default)]
    pub skills: Vec<String>,
    pub status: JobStatus,
    pub deadline: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub client: Option<Profile>,
    pub applications: Option<Vec<Application>>,
}

/// A job as returned by the browse listing: the row, its owning client,
/// and how many applications it has attracted.
#[derive(Debug, Clone, Deserialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub job: Job,
    #[serde(default, rename = "applications")]
    counts: Vec<ApplicationCount>,
}

impl JobListing {
    /// Number of applications submitted against this job.
    pub fn application_count(&self) -> i64 {
        self.counts.first().map(|c| c.count).unwrap_or(0)
    }
}

/// Row shape produced by the `applications(count)` embed.
#[derive(Debug, Clone, Deserialize)]
struct ApplicationCount {
    count: i64,
}

/// DTO for posting a new job. Status and timestamps are assigned by the
/// backend; new jobs always start `open`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateJob {
    pub client_id: DbId,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub category: String,
    pub budget_type: BudgetType,
    #[validate(range(min = 0.01))]
    pub budget_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

/// Partial-merge DTO for job edits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_type: Option<BudgetType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

/// Browse filters. All optional; `category` equal to [`ALL_CATEGORIES`]
/// is treated as no category filter.
#[derive(Debug, Clone, Default)]
pub struct JobFilters {
    pub status: Option<JobStatus>,
    pub category: Option<String>,
    /// Case-insensitive substring against title or description.
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_json() -> serde_json::Value {
        serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440010",
            "client_id": "550e8400-e29b-41d4-a716-446655440011",
            "title": "Build a Mini App",
            "description": "Telegram Mini App for a storefront",
            "category": "Web Development",
            "budget_type": "fixed",
            "budget_amount": 1200.0,
            "currency": "USD",
            "skills": ["React", "TypeScript"],
            "status": "open",
            "deadline": "2024-06-01",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "client": null,
            "applications": null
        })
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(JobStatus::InProgress.as_str(), "in_progress");
    }

    #[test]
    fn listing_captures_count_embed() {
        let mut json = job_json();
        json["applications"] = serde_json::json!([{"count": 7}]);
        let listing: JobListing = serde_json::from_value(json).unwrap();
        assert_eq!(listing.application_count(), 7);
        // The count embed must not leak into the row's application list.
        assert!(listing.job.applications.is_none());
        assert_eq!(listing.job.title, "Build a Mini App");
    }

    #[test]
    fn listing_without_embed_counts_zero() {
        let mut json = job_json();
        json.as_object_mut().unwrap().remove("applications");
        let listing: JobListing = serde_json::from_value(json).unwrap();
        assert_eq!(listing.application_count(), 0);
    }

    #[test]
    fn create_job_requires_title() {
        let dto = CreateJob {
            client_id: uuid::Uuid::nil(),
            title: String::new(),
            description: "d".into(),
            category: "Design".into(),
            budget_type: BudgetType::Hourly,
            budget_amount: 25.0,
            currency: None,
            skills: vec![],
            deadline: None,
        };
        assert!(dto.validate().is_err());
    }
}
