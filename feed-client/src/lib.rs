use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

mod error;
mod http_client;

pub use error::FeedClientError;
pub use http_client::FeedClient;

#[derive(Debug, Clone, Serialize, Deserialize, Display)]
#[display("{}", name.as_deref().unwrap_or("unknown author"))]
pub struct Author {
    pub id: i64,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Display)]
#[display("#{id} {}: {content}", user_name.as_deref().unwrap_or("unknown author"))]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub user_avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Display)]
#[display("[{id}] {content} (by {user}, {likes} likes)")]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub visibility: String,
    pub user: Author,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewPost {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOwner {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Display)]
#[display("{first_name} {last_name}")]
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
    pub user: ProfileOwner,
}

/// Profile edit. Unset fields are left alone; an empty string clears one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<String>,
}

/// Feed filters, encoded as the server's query string.
#[derive(Debug, Clone, Default)]
pub struct FeedFilters {
    search: Option<String>,
    category: Option<String>,
    visibility: Option<String>,
    tags: Vec<String>,
    author_id: Option<i64>,
    sort: Option<String>,
    order: Option<String>,
    page: Option<u32>,
    per_page: Option<u32>,
}

impl FeedFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = Some(visibility.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// `created_at`, `likes` or `views`.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn page(mut self, page: u32, per_page: u32) -> Self {
        self.page = Some(page);
        self.per_page = Some(per_page);
        self
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let scalars = [
            ("search", self.search.clone()),
            ("category", self.category.clone()),
            ("visibility", self.visibility.clone()),
            ("user_id", self.author_id.map(|id| id.to_string())),
            ("sort", self.sort.clone()),
            ("order", self.order.clone()),
            ("page", self.page.map(|p| p.to_string())),
            ("per_page", self.per_page.map(|p| p.to_string())),
        ];
        for (key, value) in scalars {
            if let Some(value) = value {
                query.push((key, value));
            }
        }
        query.extend(self.tags.iter().map(|tag| ("tags", tag.clone())));
        query
    }
}

#[async_trait]
pub trait FeedApi {
    async fn list_posts(&self, filters: &FeedFilters) -> Result<FeedPage, FeedClientError>;
    async fn get_post(&self, id: i64) -> Result<Post, FeedClientError>;
    async fn categories(&self) -> Result<Vec<String>, FeedClientError>;
    async fn popular_tags(&self, limit: Option<u32>) -> Result<Vec<String>, FeedClientError>;
    async fn comments(&self, post_id: i64) -> Result<Vec<Comment>, FeedClientError>;
    async fn create_post(&self, post: &NewPost) -> Result<Post, FeedClientError>;
    async fn like_post(&self, id: i64) -> Result<i64, FeedClientError>;
    async fn add_comment(&self, post_id: i64, content: &str) -> Result<Comment, FeedClientError>;
    async fn user_profile(&self, user_id: i64) -> Result<Profile, FeedClientError>;
    async fn my_profile(&self) -> Result<Profile, FeedClientError>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, FeedClientError>;
}
