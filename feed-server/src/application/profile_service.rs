use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::data::author_repository::AuthorRepository;
use crate::data::profile_repository::ProfileRepository;
use crate::data::store::FeedStore;
use crate::domain::author::Author;
use crate::domain::error::DomainError;
use crate::domain::profile::{Profile, ProfileChanges};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub image: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub social_links: Option<String>,
    pub user: ProfileOwner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileOwner {
    pub id: i64,
    pub name: String,
}

pub fn serialize_profile(profile: Profile, owner: &Author) -> ProfileView {
    ProfileView {
        id: profile.id,
        user_id: profile.user_id,
        first_name: profile.first_name,
        last_name: profile.last_name,
        bio: profile.bio,
        location: profile.location,
        skills: profile.skills,
        experience: profile.experience,
        education: profile.education,
        image: profile.image,
        job_title: profile.job_title,
        company: profile.company,
        social_links: profile.social_links,
        user: ProfileOwner {
            id: owner.id,
            name: owner.name.clone(),
        },
    }
}

pub struct ProfileService<S: FeedStore> {
    store: Arc<S>,
}

impl<S: FeedStore> Clone for ProfileService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ProfileService<S>
where
    S: FeedStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Anyone's profile; users who never created one have none.
    pub async fn public_profile(&self, user_id: i64) -> Result<ProfileView, DomainError> {
        let owner = self.find_user(user_id).await?;
        let profile = self
            .store
            .find_profile(user_id)
            .await?
            .ok_or(DomainError::ProfileNotFound(user_id))?;
        Ok(serialize_profile(profile, &owner))
    }

    /// The caller's own profile, created with placeholder names on first read.
    #[instrument(skip(self))]
    pub async fn own_profile(&self, user_id: i64) -> Result<ProfileView, DomainError> {
        let owner = self.find_user(user_id).await?;
        let profile = self.store.ensure_profile(user_id).await?;
        Ok(serialize_profile(profile, &owner))
    }

    #[instrument(skip(self, changes))]
    pub async fn update_own_profile(
        &self,
        user_id: i64,
        changes: ProfileChanges,
    ) -> Result<ProfileView, DomainError> {
        if changes.is_empty() {
            return Err(DomainError::Validation("no profile fields provided".to_string()));
        }
        let owner = self.find_user(user_id).await?;

        let current = self
            .store
            .find_profile(user_id)
            .await?
            .unwrap_or_else(|| Profile::placeholder(user_id));
        let updated = changes.apply(current)?;
        let saved = self.store.save_profile(&updated).await?;

        info!(user_id, profile_id = saved.id, "profile updated");
        Ok(serialize_profile(saved, &owner))
    }

    async fn find_user(&self, user_id: i64) -> Result<Author, DomainError> {
        self.store
            .find_authors(&[user_id])
            .await?
            .into_iter()
            .next()
            .ok_or(DomainError::UserNotFound(user_id))
    }
}
