use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment joined with its author's name and avatar.
///
/// Author columns are nullable because they come from outer joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    pub content: String,
}
