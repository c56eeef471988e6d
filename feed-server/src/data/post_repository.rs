use crate::data::store::{PostgresStore, is_foreign_key_violation, like_pattern, store_error};
use crate::domain::error::DomainError;
use crate::domain::feed_query::{Predicate, QueryPlan};
use crate::domain::post::{NewPost, Post};
use crate::domain::tags::TagGroup;
use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use tracing::info;

const POST_COLUMNS: &str =
    "id, author_id, content, media_url, likes, tags, category, visibility, created_at";

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Whether the schema has a `views` column to sort by.
    fn supports_views(&self) -> bool;
    async fn list(&self, plan: &QueryPlan) -> Result<Vec<Post>, DomainError>;
    async fn count(&self, predicates: &[Predicate]) -> Result<u64, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError>;
    async fn create(&self, post: NewPost) -> Result<Post, DomainError>;
    /// Returns the new like count, or `None` when the post does not exist.
    async fn increment_likes(&self, id: i64) -> Result<Option<i64>, DomainError>;
    async fn distinct_categories(&self) -> Result<Vec<String>, DomainError>;
    /// The `limit` most frequent raw tag strings.
    async fn tag_groups(&self, limit: usize) -> Result<Vec<TagGroup>, DomainError>;
}

fn push_predicates(qb: &mut QueryBuilder<'static, Postgres>, predicates: &[Predicate]) {
    for predicate in predicates {
        match predicate {
            Predicate::ContentContains(needle) => {
                qb.push(" AND content ILIKE ");
                qb.push_bind(like_pattern(needle));
            }
            Predicate::CategoryIs(category) => {
                qb.push(" AND category = ");
                qb.push_bind(category.clone());
            }
            Predicate::VisibilityIs(visibility) => {
                qb.push(" AND visibility = ");
                qb.push_bind(visibility.clone());
            }
            Predicate::TagsContain(tag) => {
                qb.push(" AND tags LIKE ");
                qb.push_bind(like_pattern(tag));
            }
            Predicate::AuthorIs(author_id) => {
                qb.push(" AND author_id = ");
                qb.push_bind(*author_id);
            }
        }
    }
}

/// One page of posts matching `plan`, in plan order. Ties on the sort key
/// fall back to `id` in the same direction so pages never overlap.
fn list_query(plan: &QueryPlan) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts WHERE 1=1"));
    push_predicates(&mut qb, &plan.predicates);

    qb.push(" ORDER BY ")
        .push(plan.sort.column())
        .push(" ")
        .push(plan.order.as_sql())
        .push(", id ")
        .push(plan.order.as_sql());
    qb.push(" LIMIT ");
    qb.push_bind(i64::from(plan.limit));
    qb.push(" OFFSET ");
    qb.push_bind(i64::try_from(plan.offset).unwrap_or(i64::MAX));
    qb
}

/// Matching rows for the same predicates as [`list_query`], ignoring the page.
fn count_query(predicates: &[Predicate]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts WHERE 1=1");
    push_predicates(&mut qb, predicates);
    qb
}

// Fields holding only delimiters and blanks carry no tag and form no group.
const TAG_GROUPS_SQL: &str = r#"
    SELECT tags, COUNT(*) AS count
    FROM posts
    WHERE tags IS NOT NULL AND btrim(replace(tags, ',', '')) <> ''
    GROUP BY tags
    ORDER BY count DESC, tags ASC
    LIMIT $1
"#;

#[async_trait]
impl PostRepository for PostgresStore {
    fn supports_views(&self) -> bool {
        self.has_views_column()
    }

    async fn list(&self, plan: &QueryPlan) -> Result<Vec<Post>, DomainError> {
        let mut qb = list_query(plan);
        qb.build_query_as::<Post>()
            .fetch_all(self.pool())
            .await
            .map_err(|e| store_error("list posts", e))
    }

    async fn count(&self, predicates: &[Predicate]) -> Result<u64, DomainError> {
        let mut qb = count_query(predicates);
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(|e| store_error("count posts", e))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| store_error("find post", e))
    }

    async fn create(&self, post: NewPost) -> Result<Post, DomainError> {
        let created = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (author_id, content, media_url, tags, category, visibility)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.author_id)
        .bind(&post.content)
        .bind(&post.media_url)
        .bind(&post.tags)
        .bind(&post.category)
        .bind(&post.visibility)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::Validation(format!("unknown author: {}", post.author_id))
            } else {
                store_error("create post", e)
            }
        })?;

        info!(post_id = created.id, author_id = created.author_id, "post created");
        Ok(created)
    }

    async fn increment_likes(&self, id: i64) -> Result<Option<i64>, DomainError> {
        sqlx::query_scalar::<_, i64>("UPDATE posts SET likes = likes + 1 WHERE id = $1 RETURNING likes")
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| store_error("increment likes", e))
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, DomainError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM posts
            WHERE category IS NOT NULL AND category <> ''
            ORDER BY category
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| store_error("distinct categories", e))
    }

    async fn tag_groups(&self, limit: usize) -> Result<Vec<TagGroup>, DomainError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(TAG_GROUPS_SQL)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(self.pool())
        .await
        .map_err(|e| store_error("tag groups", e))?;

        Ok(rows
            .into_iter()
            .map(|(raw, count)| TagGroup {
                raw,
                count: u64::try_from(count).unwrap_or_default(),
            })
            .collect())
    }
}
