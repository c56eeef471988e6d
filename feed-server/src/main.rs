mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod utils;

use std::sync::Arc;

use anyhow::Context;

use application::aggregate_cache::AggregateCache;
use application::aggregate_service::AggregateService;
use application::feed_service::FeedService;
use application::profile_service::ProfileService;
use data::store::PostgresStore;
use infrastructure::config::AppConfig;
use infrastructure::database;
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = database::connect(&config.database_url).await?;
    database::migrate(&pool).await?;

    let store = Arc::new(
        PostgresStore::connect(pool)
            .await
            .context("failed to inspect the posts schema")?,
    );
    let cache = Arc::new(AggregateCache::new(config.aggregate_cache_ttl));
    tracing::info!(ttl = ?cache.ttl(), "aggregate cache ready");

    let feed = FeedService::new(
        Arc::clone(&store),
        Arc::clone(&cache),
        config.invalidate_aggregates_on_write,
    );
    let profiles = ProfileService::new(Arc::clone(&store));
    let aggregates = AggregateService::new(store, cache);
    let keys = JwtKeys::new(&config.jwt_secret);

    utils::start_rest_server(config, feed, aggregates, profiles, keys).await
}
