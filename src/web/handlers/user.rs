//! User handlers for Web API.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::auth::UserService;
use crate::web::dto::{ApiResponse, UserResponse, UuidPath};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// GET /users - List all users.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let users = UserService::new(&state.db).find_all().await?;
    Ok(Json(ApiResponse::new(
        users.iter().map(UserResponse::from).collect(),
    )))
}

/// DELETE /users/:id - Delete a user (admin only).
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID (UUID)")
    ),
    responses(
        (status = 200, description = "Deleted user", body = UserResponse),
        (status = 400, description = "Malformed ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let user = UserService::new(&state.db)
        .remove(&claims.user_id, &id.to_string())
        .await?;
    Ok(Json(ApiResponse::new(UserResponse::from(user))))
}
