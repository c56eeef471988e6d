use serde::{Deserialize, Serialize};

/// A user as the feed sees them: display name plus whatever profile exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub profile: Option<ProfileSummary>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub image: Option<String>,
    pub job_title: Option<String>,
}

impl Author {
    pub fn avatar(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.image.as_deref())
    }

    pub fn job_title(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.job_title.as_deref())
    }
}
