use std::sync::Arc;

use tracing::instrument;

use crate::application::aggregate_cache::{AggregateCache, AggregateKey};
use crate::data::post_repository::PostRepository;
use crate::domain::tags::popular_tags;

pub const DEFAULT_POPULAR_TAGS: usize = 10;
pub const MAX_POPULAR_TAGS: usize = 50;

/// Category and tag summaries over the whole post collection, served from
/// [`AggregateCache`].
pub struct AggregateService<R: PostRepository + 'static> {
    repo: Arc<R>,
    cache: Arc<AggregateCache>,
}

impl<R: PostRepository + 'static> Clone for AggregateService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<R> AggregateService<R>
where
    R: PostRepository + 'static,
{
    pub fn new(repo: Arc<R>, cache: Arc<AggregateCache>) -> Self {
        Self { repo, cache }
    }

    #[instrument(skip(self))]
    pub async fn distinct_categories(&self) -> Vec<String> {
        self.cache
            .get_or_compute(AggregateKey::Categories, || self.repo.distinct_categories())
            .await
    }

    /// Top tags under the grouping-by-raw-string policy of
    /// [`crate::domain::tags::popular_tags`].
    #[instrument(skip(self))]
    pub async fn popular_tags(&self, limit: usize) -> Vec<String> {
        let limit = limit.clamp(1, MAX_POPULAR_TAGS);
        self.cache
            .get_or_compute(AggregateKey::PopularTags { limit }, || async move {
                let groups = self.repo.tag_groups(limit).await?;
                Ok(popular_tags(&groups, limit))
            })
            .await
    }

    pub fn invalidate(&self, key: AggregateKey) {
        self.cache.invalidate(key);
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
