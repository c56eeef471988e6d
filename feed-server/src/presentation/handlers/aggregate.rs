use actix_web::{HttpResponse, web};

use crate::application::aggregate_service::AggregateService;
use crate::data::store::FeedStore;
use crate::presentation::dto::PopularTagsQuery;

// Aggregates never fail outward; an unreachable store reads as empty.

pub async fn categories<S: FeedStore>(aggregates: web::Data<AggregateService<S>>) -> HttpResponse {
    HttpResponse::Ok().json(aggregates.distinct_categories().await)
}

pub async fn popular_tags<S: FeedStore>(
    aggregates: web::Data<AggregateService<S>>,
    query: web::Query<PopularTagsQuery>,
) -> HttpResponse {
    HttpResponse::Ok().json(aggregates.popular_tags(query.limit()).await)
}
