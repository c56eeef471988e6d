pub mod aggregate_cache;
pub mod aggregate_service;
pub mod feed_service;
pub mod post_serializer;
pub mod profile_service;
