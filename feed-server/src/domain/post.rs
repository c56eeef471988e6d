use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::tags::{join_tags, split_tags};

pub const DEFAULT_VISIBILITY: &str = "public";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub likes: i64,
    /// Comma-delimited, stored exactly as written.
    pub tags: Option<String>,
    pub category: Option<String>,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(self.tags.as_deref())
    }
}

/// A post as submitted by its author, before the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub tags: Option<String>,
    pub category: Option<String>,
    pub visibility: String,
}

impl NewPost {
    pub fn new(
        author_id: i64,
        content: String,
        media_url: Option<String>,
        tags: Vec<String>,
        category: Option<String>,
        visibility: Option<String>,
    ) -> Self {
        Self {
            author_id,
            content,
            media_url: non_blank(media_url),
            tags: join_tags(tags.as_slice()),
            category: non_blank(category),
            visibility: non_blank(visibility).unwrap_or_else(|| DEFAULT_VISIBILITY.to_string()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
