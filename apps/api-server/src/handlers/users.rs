//! Registration.

use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;
use quill_shared::dto::{RegisterUserRequest, RegisteredUserResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/users - creates the user and returns an access token for it.
/// An `admin_secret` in the body is checked before the user is created.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let roles = state.roles_for(req.admin_secret.as_deref())?;

    let user = state.users.register(&req.name, &req.password).await?;

    let access_token = state
        .tokens
        .generate_token(user.id, &user.name, roles)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "User registered",
        RegisteredUserResponse {
            user: user.into(),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: u64::try_from(state.tokens.expiration_seconds()).unwrap_or(0),
        },
    )))
}
