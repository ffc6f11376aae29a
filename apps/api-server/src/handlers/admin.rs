//! Administrative routes; every handler requires the `admin` role.

use actix_web::{HttpResponse, web};

use quill_core::query::PostSortField;
use quill_shared::ApiResponse;

use super::params::ListParams;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// GET /api/v1/admin/posts - unpaginated, soft-deleted posts included.
pub async fn all_posts(
    state: web::Data<AppState>,
    identity: Identity,
    params: ListParams,
) -> actix_web::Result<HttpResponse> {
    identity.require_admin()?;
    let keyword = params.keyword().map_err(AppError::from)?;
    let sort = params.sort::<PostSortField>().map_err(AppError::from)?;

    let posts = state
        .posts
        .get_all_including_deleted(&keyword, &sort)
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("All posts retrieved", posts)))
}

/// DELETE /api/v1/admin/users - removes every user and their content.
pub async fn purge_users(
    state: web::Data<AppState>,
    identity: Identity,
) -> actix_web::Result<HttpResponse> {
    identity.require_admin()?;
    tracing::warn!(admin = %identity.name, "Purging all users");

    let removed = state.users.purge_all().await.map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("All users removed", removed)))
}
