use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

use crate::application::feed_service::FeedService;
use crate::data::store::FeedStore;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreatePostRequest, LikeResponse, ListPostsParams};
use crate::presentation::utils::{AuthenticatedUser, request_id};

pub async fn list_posts<S: FeedStore>(
    req: HttpRequest,
    feed: web::Data<FeedService<S>>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<HttpResponse, DomainError> {
    let query = ListPostsParams::from_pairs(query.into_inner()).into_query();
    let page = feed.list_posts(&query).await?;

    info!(
        request_id = %request_id(&req),
        returned = page.posts.len(),
        total = page.total,
        page = page.page,
        "feed page served"
    );

    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_post<S: FeedStore>(
    feed: web::Data<FeedService<S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let post = feed.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn create_post<S: FeedStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    feed: web::Data<FeedService<S>>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    let post = feed
        .create_post(payload.into_inner().into_new_post(user.id))
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        post_id = post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(post))
}

pub async fn like_post<S: FeedStore>(
    _user: AuthenticatedUser,
    feed: web::Data<FeedService<S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let likes = feed.like_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LikeResponse { likes }))
}
