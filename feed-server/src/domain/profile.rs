use crate::domain::author::ProfileSummary;
use crate::domain::error::DomainError;

/// Names given to a profile created before its owner filled it in.
pub const PLACEHOLDER_FIRST_NAME: &str = "First";
pub const PLACEHOLDER_LAST_NAME: &str = "Last";

const NAME_MAX_CHARS: usize = 80;
const BIO_MAX_CHARS: usize = 500;
const LOCATION_MAX_CHARS: usize = 120;
const WORK_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Profile {
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
}

impl Profile {
    /// An unsaved profile (`id == 0`) with placeholder names.
    pub fn placeholder(user_id: i64) -> Self {
        Self {
            id: 0,
            user_id,
            first_name: PLACEHOLDER_FIRST_NAME.to_string(),
            last_name: PLACEHOLDER_LAST_NAME.to_string(),
            bio: None,
            location: None,
            skills: None,
            experience: None,
            education: None,
            image: None,
            job_title: None,
            company: None,
            social_links: None,
        }
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            image: self.image.clone(),
            job_title: self.job_title.clone(),
        }
    }
}

/// Text edits to a profile.
///
/// For each field the outer `Option` says whether it was sent at all; a sent
/// blank value clears the field. Names may be changed but never cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub skills: Option<Option<String>>,
    pub experience: Option<Option<String>>,
    pub education: Option<Option<String>>,
    pub job_title: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub social_links: Option<Option<String>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, mut profile: Profile) -> Result<Profile, DomainError> {
        if let Some(first_name) = self.first_name {
            profile.first_name = required_name(first_name)?;
        }
        if let Some(last_name) = self.last_name {
            profile.last_name = required_name(last_name)?;
        }

        set(&mut profile.bio, self.bio, Some(BIO_MAX_CHARS));
        set(&mut profile.location, self.location, Some(LOCATION_MAX_CHARS));
        set(&mut profile.skills, self.skills, None);
        set(&mut profile.experience, self.experience, None);
        set(&mut profile.education, self.education, None);
        set(&mut profile.job_title, self.job_title, Some(WORK_MAX_CHARS));
        set(&mut profile.company, self.company, Some(WORK_MAX_CHARS));
        set(&mut profile.social_links, self.social_links, None);

        Ok(profile)
    }
}

fn required_name(value: Option<String>) -> Result<String, DomainError> {
    clean(value, Some(NAME_MAX_CHARS)).ok_or_else(|| {
        DomainError::Validation("first name and last name are required".to_string())
    })
}

fn set(field: &mut Option<String>, change: Option<Option<String>>, max_chars: Option<usize>) {
    if let Some(value) = change {
        *field = clean(value, max_chars);
    }
}

fn clean(value: Option<String>, max_chars: Option<usize>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(match max_chars {
        Some(max) => value.chars().take(max).collect(),
        None => value.to_string(),
    })
}
