//! Comment handlers, nested under a post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::query::CommentSortField;
use quill_shared::ApiResponse;
use quill_shared::dto::{CommentCreateRequest, CommentDto};

use super::params::ListParams;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/posts/{id}/comments
pub async fn list(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    params: ListParams,
) -> AppResult<HttpResponse> {
    let request = params.page_request::<CommentSortField>()?;

    let page = state
        .comments
        .get_all_by_post_id(path.into_inner(), &request)
        .await?
        .map(CommentDto::from);

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Comments retrieved", page)))
}

/// POST /api/v1/posts/{id}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentCreateRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    tracing::debug!(%post_id, user_id = %identity.user_id, "Commenting");

    let comment = state
        .comments
        .create_comment(post_id, &body.content)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "Comment created",
        CommentDto::from(comment),
    )))
}
