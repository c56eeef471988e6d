use crate::data::store::{PostgresStore, is_foreign_key_violation, store_error};
use crate::domain::comment::{CommentRecord, NewComment};
use crate::domain::error::DomainError;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments of all given posts, oldest first.
    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<Vec<CommentRecord>, DomainError>;
    async fn create_comment(&self, comment: NewComment) -> Result<CommentRecord, DomainError>;

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentRecord>, DomainError> {
        self.list_for_posts(&[post_id]).await
    }
}

#[async_trait]
impl CommentRepository for PostgresStore {
    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<Vec<CommentRecord>, DomainError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT c.id, c.post_id, c.author_id,
                   u.name AS author_name, p.image AS author_avatar,
                   c.content, c.created_at
            FROM comments c
            LEFT JOIN users u ON u.id = c.author_id
            LEFT JOIN profiles p ON p.user_id = c.author_id
            WHERE c.post_id = ANY($1)
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post_ids)
        .fetch_all(self.pool())
        .await
        .map_err(|e| store_error("list comments", e))
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CommentRecord, DomainError> {
        let created = sqlx::query_as::<_, CommentRecord>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, author_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, author_id, content, created_at
            )
            SELECT i.id, i.post_id, i.author_id,
                   u.name AS author_name, p.image AS author_avatar,
                   i.content, i.created_at
            FROM inserted i
            LEFT JOIN users u ON u.id = i.author_id
            LEFT JOIN profiles p ON p.user_id = i.author_id
            "#,
        )
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::Validation("unknown post or author".to_string())
            } else {
                store_error("create comment", e)
            }
        })?;

        info!(comment_id = created.id, post_id = created.post_id, "comment added");
        Ok(created)
    }
}
