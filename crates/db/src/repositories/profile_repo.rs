//! Repository for the `profiles` table.

use gigram_core::error::CoreError;
use gigram_core::types::{DbId, TelegramId};
use validator::Validate;

use crate::client::SupabaseClient;
use crate::error::{DbError, DbResult};
use crate::models::profile::{FreelancerFilters, Profile, Role, UpdateProfile, UpsertProfile};

/// Provides profile lookup, onboarding upsert, and freelancer search.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Create-or-replace a profile keyed on its Telegram identity.
    ///
    /// Calling this twice for the same `telegram_id` merges the second
    /// call's fields into the existing row instead of inserting a
    /// duplicate. A uniqueness rejection from the backend surfaces as
    /// [`CoreError::Conflict`].
    pub async fn upsert(client: &SupabaseClient, profile: &UpsertProfile) -> DbResult<Profile> {
        profile
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        client
            .from("profiles")
            .select("*")
            .upsert(profile, "telegram_id")
            .await
    }

    /// Look up a profile by Telegram identity.
    ///
    /// `None` means no such profile exists yet (the onboarding case) and
    /// is deliberately not an error.
    pub async fn find_by_telegram_id(
        client: &SupabaseClient,
        telegram_id: TelegramId,
    ) -> DbResult<Option<Profile>> {
        client
            .from("profiles")
            .select("*")
            .eq("telegram_id", telegram_id)
            .maybe_one()
            .await
    }

    /// Fetch a profile by row id.
    pub async fn get(client: &SupabaseClient, profile_id: DbId) -> DbResult<Profile> {
        client
            .from("profiles")
            .select("*")
            .eq("id", profile_id)
            .maybe_one()
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "profile",
                    id: profile_id,
                }
                .into()
            })
    }

    /// Apply a partial merge to a profile.
    pub async fn update(
        client: &SupabaseClient,
        profile_id: DbId,
        updates: &UpdateProfile,
    ) -> DbResult<Profile> {
        let rows: Vec<Profile> = client
            .from("profiles")
            .select("*")
            .eq("id", profile_id)
            .update(updates)
            .await?;
        rows.into_iter().next().ok_or_else(|| {
            DbError::from(CoreError::NotFound {
                entity: "profile",
                id: profile_id,
            })
        })
    }

    /// Search freelancer profiles.
    ///
    /// Skill filtering is any-overlap, rating/rate bounds are inclusive,
    /// and the text filter is a case-insensitive substring match across
    /// first name, title, and description. Results come back ordered by
    /// rating descending; an empty filter set returns all freelancers.
    pub async fn search_freelancers(
        client: &SupabaseClient,
        filters: &FreelancerFilters,
    ) -> DbResult<Vec<Profile>> {
        let mut query = client
            .from("profiles")
            .select("*")
            .eq("role", Role::Freelancer.as_str());

        if !filters.skills.is_empty() {
            query = query.overlaps("skills", &filters.skills);
        }
        if let Some(min_rating) = filters.min_rating {
            query = query.gte("rating", min_rating);
        }
        if let Some(max_rate) = filters.max_rate {
            query = query.lte("hourly_rate", max_rate);
        }
        if let Some(search) = filters.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.or(&format!(
                "first_name.ilike.*{search}*,title.ilike.*{search}*,description.ilike.*{search}*"
            ));
        }

        query.order("rating", false).fetch().await
    }
}
