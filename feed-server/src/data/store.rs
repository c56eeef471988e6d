use sqlx::PgPool;
use tracing::{error, info};

use crate::data::author_repository::AuthorRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::profile_repository::ProfileRepository;
use crate::domain::error::DomainError;

/// Everything the feed reads and writes, as one bound for the services.
pub trait FeedStore:
    PostRepository + CommentRepository + AuthorRepository + ProfileRepository + Send + Sync + 'static
{
}

impl<T> FeedStore for T where
    T: PostRepository + CommentRepository + AuthorRepository + ProfileRepository + Send + Sync + 'static
{
}

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
    views_column: bool,
}

impl PostgresStore {
    pub fn new(pool: PgPool, views_column: bool) -> Self {
        Self { pool, views_column }
    }

    /// Builds the store after checking which optional columns the schema has.
    pub async fn connect(pool: PgPool) -> Result<Self, DomainError> {
        let views_column: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.columns
                WHERE table_schema = current_schema()
                  AND table_name = 'posts'
                  AND column_name = 'views'
            )
            "#,
        )
        .fetch_one(&pool)
        .await
        .map_err(|e| store_error("detect posts.views", e))?;

        info!(views_column, "post store ready");
        Ok(Self::new(pool, views_column))
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub(crate) fn has_views_column(&self) -> bool {
        self.views_column
    }
}

pub(crate) fn store_error(operation: &str, e: sqlx::Error) -> DomainError {
    error!(operation, "database error: {}", e);
    DomainError::StoreUnavailable
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23503")
}

/// Wraps a user-supplied needle for `LIKE`/`ILIKE`, escaping wildcards.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
