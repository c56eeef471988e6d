use crate::data::store::{PostgresStore, store_error};
use crate::domain::author::{Author, ProfileSummary};
use crate::domain::error::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Authors for the given ids; unknown ids are simply absent.
    async fn find_authors(&self, ids: &[i64]) -> Result<Vec<Author>, DomainError>;
}

#[derive(sqlx::FromRow)]
struct AuthorRow {
    id: i64,
    name: String,
    profile_id: Option<i64>,
    image: Option<String>,
    job_title: Option<String>,
}

impl From<AuthorRow> for Author {
    fn from(row: AuthorRow) -> Self {
        let profile = row.profile_id.map(|_| ProfileSummary {
            image: row.image,
            job_title: row.job_title,
        });
        Self {
            id: row.id,
            name: row.name,
            profile,
        }
    }
}

#[async_trait]
impl AuthorRepository for PostgresStore {
    async fn find_authors(&self, ids: &[i64]) -> Result<Vec<Author>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, AuthorRow>(
            r#"
            SELECT u.id, u.name, p.id AS profile_id, p.image, p.job_title
            FROM users u
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE u.id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(self.pool())
        .await
        .map_err(|e| store_error("find authors", e))?;

        Ok(rows.into_iter().map(Author::from).collect())
    }
}
