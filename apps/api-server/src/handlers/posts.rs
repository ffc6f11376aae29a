//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::query::PostSortField;
use quill_shared::ApiResponse;
use quill_shared::dto::{PostCreateRequest, PostUpdateRequest};

use super::params::ListParams;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/v1/posts
pub async fn list(state: web::Data<AppState>, params: ListParams) -> AppResult<HttpResponse> {
    let keyword = params.keyword()?;
    let request = params.page_request::<PostSortField>()?;

    let page = state.posts.get_post_dto_all(&keyword, &request).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Posts retrieved", page)))
}

/// POST /api/v1/posts - a `parent_id` in the body makes the post a reply.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostCreateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post_id = match req.parent_id {
        Some(parent_id) => {
            state
                .posts
                .register_reply(identity.user_id, parent_id, &req.title, &req.content)
                .await?
        }
        None => {
            state
                .posts
                .register_post(identity.user_id, &req.title, &req.content)
                .await?
        }
    };
    let post = state.posts.get_post_dto_by_id(post_id).await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok("Post created", post)))
}

/// GET /api/v1/posts/{id} - counts as one view.
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .get_post_dto_by_id_and_increase_views(path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Post retrieved", post)))
}

/// POST /api/v1/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostUpdateRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let req = body.into_inner();

    state
        .posts
        .update(&req.title, &req.content, post_id, identity.user_id, &req.tags)
        .await?;
    let post = state.posts.get_post_dto_by_id(post_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Post updated", post)))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .soft_delete_my_post(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::empty("Post deleted")))
}

/// GET /api/v1/posts/my
pub async fn my_posts(
    state: web::Data<AppState>,
    identity: Identity,
    params: ListParams,
) -> AppResult<HttpResponse> {
    let keyword = params.keyword()?;
    let request = params.page_request::<PostSortField>()?;

    let page = state
        .posts
        .get_my_post_dto_all(identity.user_id, &keyword, &request)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Your posts retrieved", page)))
}

/// GET /api/v1/posts/my/roots
pub async fn my_root_posts(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let roots = state.posts.get_my_root_posts(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Your top-level posts retrieved", roots)))
}
