use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;

use crate::application::profile_service::ProfileService;
use crate::data::store::FeedStore;
use crate::domain::error::DomainError;
use crate::presentation::dto::UpdateProfileRequest;
use crate::presentation::utils::{AuthenticatedUser, request_id};

pub async fn get_user_profile<S: FeedStore>(
    profiles: web::Data<ProfileService<S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, DomainError> {
    let profile = profiles.public_profile(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn get_own_profile<S: FeedStore>(
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService<S>>,
) -> Result<HttpResponse, DomainError> {
    let profile = profiles.own_profile(user.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn update_own_profile<S: FeedStore>(
    req: HttpRequest,
    user: AuthenticatedUser,
    profiles: web::Data<ProfileService<S>>,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, DomainError> {
    let profile = profiles
        .update_own_profile(user.id, payload.into_inner().into())
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = user.id,
        "profile updated"
    );

    Ok(HttpResponse::Ok().json(profile))
}
