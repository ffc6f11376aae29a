//! Like handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::query::LikeSortField;
use quill_shared::ApiResponse;
use quill_shared::dto::{LikeCountDto, LikeDto};

use super::params::ListParams;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/posts/{id}/likes
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let like = state
        .likes
        .like_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok("Post liked", LikeDto::from(like))))
}

/// DELETE /api/v1/posts/{id}/likes
pub async fn unlike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .likes
        .unlike_post(identity.user_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::empty("Like removed")))
}

/// GET /api/v1/posts/{id}/likes
pub async fn count(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let likes = state.likes.count_likes(post_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Like count retrieved",
        LikeCountDto { post_id, likes },
    )))
}

/// GET /api/v1/posts/liked
pub async fn liked_posts(
    state: web::Data<AppState>,
    identity: Identity,
    params: ListParams,
) -> AppResult<HttpResponse> {
    let keyword = params.keyword()?;
    let sort = params.sort::<LikeSortField>()?;

    let liked = state
        .likes
        .find_liked_posts(identity.user_id, &sort, &keyword)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Liked posts retrieved", liked)))
}
