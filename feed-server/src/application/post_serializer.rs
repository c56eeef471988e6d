//! Output shape of a post: the post row joined with its author, the author's
//! profile and the post's comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::author::Author;
use crate::domain::comment::CommentRecord;
use crate::domain::post::Post;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub content: String,
    pub media_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub visibility: String,
    pub user: AuthorView,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: i64,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub user_avatar: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<CommentRecord> for CommentView {
    fn from(record: CommentRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.author_id,
            user_name: record.author_name,
            user_avatar: record.author_avatar,
            content: record.content,
            created_at: record.created_at,
        }
    }
}

/// `comments` must already be in display order (oldest first).
pub fn serialize_post(post: Post, author: Option<&Author>, comments: Vec<CommentRecord>) -> PostView {
    let tags = post.tag_list();
    let user = AuthorView {
        id: post.author_id,
        name: author.map(|a| a.name.clone()),
        avatar: author.and_then(Author::avatar).map(str::to_owned),
        job_title: author.and_then(Author::job_title).map(str::to_owned),
    };

    PostView {
        id: post.id,
        content: post.content,
        media_url: post.media_url,
        created_at: post.created_at,
        likes: post.likes,
        tags,
        category: post.category,
        visibility: post.visibility,
        user,
        comments: comments.into_iter().map(CommentView::from).collect(),
    }
}
