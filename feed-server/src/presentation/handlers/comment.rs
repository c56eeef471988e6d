use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

use crate::application::feed_service::FeedService;
use crate::data::store::FeedStore;
use crate::domain::error::DomainError;
use crate::presentation::dto::CreateCommentRequest;
use crate::presentation::utils::{AuthenticatedUser, request_id};

pub async fn list_comments<S: FeedStore>(
    feed: web::Data<FeedService<S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let comments = feed.list_comments(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn add_comment<S: FeedStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    feed: web::Data<FeedService<S>>,
    path: web::Path<i64>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let comment = feed
        .add_comment(post_id, user.id, payload.into_inner().content)
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        post_id,
        comment_id = comment.id,
        "comment added"
    );

    Ok(HttpResponse::Created().json(comment))
}
