use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::application::aggregate_cache::AggregateCache;
use crate::application::post_serializer::{CommentView, PostView, serialize_post};
use crate::data::author_repository::AuthorRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::data::store::FeedStore;
use crate::domain::author::Author;
use crate::domain::comment::{CommentRecord, NewComment};
use crate::domain::error::DomainError;
use crate::domain::feed_query::FeedQuery;
use crate::domain::post::{NewPost, Post};

#[derive(Debug, Serialize)]
pub struct FeedPage {
    pub posts: Vec<PostView>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

pub struct FeedService<S: FeedStore> {
    store: Arc<S>,
    aggregates: Arc<AggregateCache>,
    invalidate_on_write: bool,
}

impl<S: FeedStore> Clone for FeedService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            aggregates: Arc::clone(&self.aggregates),
            invalidate_on_write: self.invalidate_on_write,
        }
    }
}

impl<S> FeedService<S>
where
    S: FeedStore,
{
    pub fn new(store: Arc<S>, aggregates: Arc<AggregateCache>, invalidate_on_write: bool) -> Self {
        Self {
            store,
            aggregates,
            invalidate_on_write,
        }
    }

    /// One page of the feed plus the number of posts matching the filters.
    #[instrument(skip(self))]
    pub async fn list_posts(&self, query: &FeedQuery) -> Result<FeedPage, DomainError> {
        let plan = query.plan(self.store.supports_views());
        let (posts, total) = tokio::try_join!(
            self.store.list(&plan),
            self.store.count(&plan.predicates)
        )?;

        Ok(FeedPage {
            posts: self.hydrate(posts).await?,
            total,
            page: query.pagination.page,
            per_page: query.pagination.per_page,
        })
    }

    pub async fn get_post(&self, id: i64) -> Result<PostView, DomainError> {
        let post = self.find_post(id).await?;
        let mut views = self.hydrate(vec![post]).await?;
        views.pop().ok_or(DomainError::PostNotFound(id))
    }

    #[instrument(skip(self, post), fields(author_id = post.author_id))]
    pub async fn create_post(&self, post: NewPost) -> Result<PostView, DomainError> {
        if post.content.trim().is_empty() {
            return Err(DomainError::Validation("content is required".to_string()));
        }

        let created = self.store.create(post).await?;
        if self.invalidate_on_write {
            self.aggregates.invalidate_all();
        }

        let mut views = self.hydrate(vec![created]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Internal("created post vanished".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn like_post(&self, id: i64) -> Result<i64, DomainError> {
        let likes = self
            .store
            .increment_likes(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))?;

        info!(post_id = id, likes, "post liked");
        Ok(likes)
    }

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<CommentView>, DomainError> {
        self.find_post(post_id).await?;
        let comments = self.store.list_for_post(post_id).await?;
        Ok(comments.into_iter().map(CommentView::from).collect())
    }

    #[instrument(skip(self, content))]
    pub async fn add_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: String,
    ) -> Result<CommentView, DomainError> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::Validation("content is required".to_string()));
        }
        self.find_post(post_id).await?;

        let comment = self
            .store
            .create_comment(NewComment {
                post_id,
                author_id,
                content,
            })
            .await?;
        Ok(CommentView::from(comment))
    }

    async fn find_post(&self, id: i64) -> Result<Post, DomainError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    /// Joins authors, profiles and comments onto a page of posts with one
    /// lookup each, whatever the page size.
    async fn hydrate(&self, posts: Vec<Post>) -> Result<Vec<PostView>, DomainError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<i64> = posts.iter().map(|p| p.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();
        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        let (authors, comments) = tokio::try_join!(
            self.store.find_authors(&author_ids),
            self.store.list_for_posts(&post_ids)
        )?;

        let authors: HashMap<i64, Author> = authors.into_iter().map(|a| (a.id, a)).collect();
        let mut comments_by_post: HashMap<i64, Vec<CommentRecord>> = HashMap::new();
        for comment in comments {
            comments_by_post.entry(comment.post_id).or_default().push(comment);
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let comments = comments_by_post.remove(&post.id).unwrap_or_default();
                let author = authors.get(&post.author_id);
                serialize_post(post, author, comments)
            })
            .collect())
    }
}
