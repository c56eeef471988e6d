use crate::data::store::{PostgresStore, is_foreign_key_violation, store_error};
use crate::domain::error::DomainError;
use crate::domain::profile::{PLACEHOLDER_FIRST_NAME, PLACEHOLDER_LAST_NAME, Profile};
use async_trait::async_trait;
use tracing::info;

const PROFILE_COLUMNS: &str = "id, user_id, first_name, last_name, bio, location, skills, \
     experience, education, image, job_title, company, social_links";

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_profile(&self, user_id: i64) -> Result<Option<Profile>, DomainError>;
    /// The user's profile, created with placeholder names if it did not exist.
    async fn ensure_profile(&self, user_id: i64) -> Result<Profile, DomainError>;
    /// Writes every text field of `profile`, inserting the row when missing.
    /// `image` is left untouched.
    async fn save_profile(&self, profile: &Profile) -> Result<Profile, DomainError>;
}

fn unknown_user(user_id: i64, operation: &str, e: sqlx::Error) -> DomainError {
    if is_foreign_key_violation(&e) {
        DomainError::UserNotFound(user_id)
    } else {
        store_error(operation, e)
    }
}

#[async_trait]
impl ProfileRepository for PostgresStore {
    async fn find_profile(&self, user_id: i64) -> Result<Option<Profile>, DomainError> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| store_error("find profile", e))
    }

    async fn ensure_profile(&self, user_id: i64) -> Result<Profile, DomainError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (user_id, first_name, last_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(PLACEHOLDER_FIRST_NAME)
        .bind(PLACEHOLDER_LAST_NAME)
        .fetch_one(self.pool())
        .await
        .map_err(|e| unknown_user(user_id, "ensure profile", e))
    }

    async fn save_profile(&self, profile: &Profile) -> Result<Profile, DomainError> {
        let saved = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (
                user_id, first_name, last_name, bio, location, skills,
                experience, education, job_title, company, social_links
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                bio = EXCLUDED.bio,
                location = EXCLUDED.location,
                skills = EXCLUDED.skills,
                experience = EXCLUDED.experience,
                education = EXCLUDED.education,
                job_title = EXCLUDED.job_title,
                company = EXCLUDED.company,
                social_links = EXCLUDED.social_links
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.user_id)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.bio)
        .bind(&profile.location)
        .bind(&profile.skills)
        .bind(&profile.experience)
        .bind(&profile.education)
        .bind(&profile.job_title)
        .bind(&profile.company)
        .bind(&profile.social_links)
        .fetch_one(self.pool())
        .await
        .map_err(|e| unknown_user(profile.user_id, "save profile", e))?;

        info!(user_id = saved.user_id, profile_id = saved.id, "profile saved");
        Ok(saved)
    }
}
