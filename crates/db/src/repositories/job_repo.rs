//! Repository for the `jobs` and `applications` tables.

use gigram_core::error::CoreError;
use gigram_core::types::DbId;
use validator::Validate;

use crate::client::SupabaseClient;
use crate::error::{DbError, DbResult};
use crate::models::application::{Application, ApplicationStatus, CreateApplication};
use crate::models::job::{
    CreateJob, Job, JobFilters, JobListing, JobStatus, UpdateJob, ALL_CATEGORIES,
};

/// Embed expression for the browse listing: owning client plus an
/// application count.
const LISTING_SELECT: &str = "*,client:profiles!jobs_client_id_fkey(*),applications(count)";

/// Embed expression for a client's own jobs: full application list with
/// each applicant's profile.
const CLIENT_JOBS_SELECT: &str =
    "*,applications(*,freelancer:profiles!applications_freelancer_id_fkey(*))";

/// Embed expression for a freshly submitted application: parent job and
/// the applicant's profile.
const APPLICATION_SELECT: &str =
    "*,job:jobs(*),freelancer:profiles!applications_freelancer_id_fkey(*)";

/// Embed expression for a freelancer's application list: each parent job
/// with its owning client.
const FREELANCER_APPLICATIONS_SELECT: &str =
    "*,job:jobs(*,client:profiles!jobs_client_id_fkey(*))";

/// Provides job posting, browsing, and application handling.
pub struct JobRepo;

impl JobRepo {
    /// Browse jobs, newest first.
    ///
    /// Every supplied filter narrows the result: status equality,
    /// category equality (the "All Categories" sentinel means no
    /// filter), and a case-insensitive substring match against title or
    /// description.
    pub async fn list(client: &SupabaseClient, filters: &JobFilters) -> DbResult<Vec<JobListing>> {
        let mut query = client.from("jobs").select(LISTING_SELECT);

        if let Some(status) = filters.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(category) = filters
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
        {
            query = query.eq("category", category);
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.or(&format!(
                "title.ilike.*{search}*,description.ilike.*{search}*"
            ));
        }

        query.order("created_at", false).fetch().await
    }

    /// All jobs posted by one client, newest first, each carrying its
    /// full application list with applicant profiles.
    pub async fn list_by_client(client: &SupabaseClient, client_id: DbId) -> DbResult<Vec<Job>> {
        client
            .from("jobs")
            .select(CLIENT_JOBS_SELECT)
            .eq("client_id", client_id)
            .order("created_at", false)
            .fetch()
            .await
    }

    /// Post a new job. The backend assigns id, timestamps, and the
    /// initial `open` status.
    pub async fn create(client: &SupabaseClient, job: &CreateJob) -> DbResult<Job> {
        job.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        client.from("jobs").select("*").insert(job).await
    }

    /// Apply a partial merge to a job.
    pub async fn update(
        client: &SupabaseClient,
        job_id: DbId,
        updates: &UpdateJob,
    ) -> DbResult<Job> {
        let rows: Vec<Job> = client
            .from("jobs")
            .select("*")
            .eq("id", job_id)
            .update(updates)
            .await?;
        rows.into_iter().next().ok_or_else(|| {
            DbError::from(CoreError::NotFound {
                entity: "job",
                id: job_id,
            })
        })
    }

    /// Submit a bid against a job. Returns the stored application with
    /// its parent job and the applicant's profile expanded.
    pub async fn apply(
        client: &SupabaseClient,
        application: &CreateApplication,
    ) -> DbResult<Application> {
        application
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        client
            .from("applications")
            .select(APPLICATION_SELECT)
            .insert(application)
            .await
    }

    /// All applications submitted by one freelancer, newest first, each
    /// with its parent job and that job's client expanded.
    pub async fn list_applications_by_freelancer(
        client: &SupabaseClient,
        freelancer_id: DbId,
    ) -> DbResult<Vec<Application>> {
        client
            .from("applications")
            .select(FREELANCER_APPLICATIONS_SELECT)
            .eq("freelancer_id", freelancer_id)
            .order("created_at", false)
            .fetch()
            .await
    }

    /// Update an application's status.
    ///
    /// Accepting an application also moves the parent job to
    /// `in_progress`. The two writes are independent: when the job
    /// update fails after the application update succeeded, the failure
    /// is logged and swallowed, and the caller sees only the updated
    /// application — job status then lags until someone re-drives it.
    pub async fn set_application_status(
        client: &SupabaseClient,
        application_id: DbId,
        status: ApplicationStatus,
    ) -> DbResult<Application> {
        let rows: Vec<Application> = client
            .from("applications")
            .select("*")
            .eq("id", application_id)
            .update(&serde_json::json!({ "status": status.as_str() }))
            .await?;
        let application = rows.into_iter().next().ok_or_else(|| {
            DbError::from(CoreError::NotFound {
                entity: "application",
                id: application_id,
            })
        })?;

        if status == ApplicationStatus::Accepted {
            let job_patch = serde_json::json!({ "status": JobStatus::InProgress.as_str() });
            if let Err(e) = client
                .from("jobs")
                .eq("id", application.job_id)
                .update_only(&job_patch)
                .await
            {
                tracing::error!(
                    application_id = %application_id,
                    job_id = %application.job_id,
                    error = %e,
                    "Failed to move job to in_progress after accepting application",
                );
            }
        }

        Ok(application)
    }
}
