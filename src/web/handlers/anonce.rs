//! Anonce handlers for Web API.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::board::{
    AnonceDetails, AnonceInput, AnonceService, AnonceWithAuthor, CommentWithAuthor, ReadRecord,
    ReadWithAnonce, ReadWithUser,
};
use crate::web::dto::{AnonceRequest, ApiResponse, CommentRequest, UuidPath, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /anonces - Create or edit an anonce (admin only).
#[utoipa::path(
    post,
    path = "/anonces",
    tag = "anonces",
    request_body = AnonceRequest,
    responses(
        (status = 201, description = "Anonce saved", body = AnonceWithAuthor),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 422, description = "Validation error")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn create_or_edit_anonce(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<AnonceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AnonceWithAuthor>>), ApiError> {
    let mut input = AnonceInput::new(req.title, req.content);
    if let Some(id) = req.id {
        input = input.with_id(id.to_string());
    }

    let anonce = AnonceService::new(&state.db)
        .create_or_edit(&claims.user_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(anonce))))
}

/// GET /anonces - List anonces, newest first.
#[utoipa::path(
    get,
    path = "/anonces",
    tag = "anonces",
    responses(
        (status = 200, description = "All anonces", body = Vec<AnonceWithAuthor>)
    )
)]
pub async fn list_anonces(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AnonceWithAuthor>>>, ApiError> {
    let anonces = AnonceService::new(&state.db).find_all().await?;
    Ok(Json(ApiResponse::new(anonces)))
}

/// GET /anonces/:id - Get one anonce.
#[utoipa::path(
    get,
    path = "/anonces/{id}",
    tag = "anonces",
    params(
        ("id" = String, Path, description = "Anonce ID (UUID)")
    ),
    responses(
        (status = 200, description = "Anonce", body = AnonceWithAuthor),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "Anonce not found")
    )
)]
pub async fn get_anonce(
    State(state): State<Arc<AppState>>,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<AnonceWithAuthor>>, ApiError> {
    let anonce = AnonceService::new(&state.db)
        .get_by_id(&id.to_string())
        .await?;
    Ok(Json(ApiResponse::new(anonce)))
}

/// POST /anonces/read/:id - Mark an anonce as read by the caller.
#[utoipa::path(
    post,
    path = "/anonces/read/{id}",
    tag = "anonces",
    params(
        ("id" = String, Path, description = "Anonce ID (UUID)")
    ),
    responses(
        (status = 200, description = "Read record", body = ReadRecord),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Anonce not found")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn mark_as_read(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<ReadRecord>>, ApiError> {
    let read = AnonceService::new(&state.db)
        .mark_as_read(&claims.user_id, &id.to_string())
        .await?;
    Ok(Json(ApiResponse::new(read)))
}

/// GET /anonces/read-by-user - Anonces the caller has read.
#[utoipa::path(
    get,
    path = "/anonces/read-by-user",
    tag = "anonces",
    responses(
        (status = 200, description = "Read records", body = Vec<ReadWithAnonce>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn read_by_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<Vec<ReadWithAnonce>>>, ApiError> {
    let reads = AnonceService::new(&state.db)
        .read_by_user(&claims.user_id)
        .await?;
    Ok(Json(ApiResponse::new(reads)))
}

/// GET /anonces/:id/readers - Who read an anonce (admin only).
#[utoipa::path(
    get,
    path = "/anonces/{id}/readers",
    tag = "anonces",
    params(
        ("id" = String, Path, description = "Anonce ID (UUID)")
    ),
    responses(
        (status = 200, description = "Readers", body = Vec<ReadWithUser>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn readers(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<Vec<ReadWithUser>>>, ApiError> {
    let readers = AnonceService::new(&state.db)
        .readers(&claims.user_id, &id.to_string())
        .await?;
    Ok(Json(ApiResponse::new(readers)))
}

/// POST /anonces/comment - Comment on an anonce.
#[utoipa::path(
    post,
    path = "/anonces/comment",
    tag = "anonces",
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentWithAuthor),
        (status = 400, description = "Empty comment"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Anonce not found")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn comment(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentWithAuthor>>), ApiError> {
    let comment = AnonceService::new(&state.db)
        .comment(&claims.user_id, &req.anonce_id.to_string(), &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(comment))))
}

/// GET /anonces/:id/details - Anonce with the comments visible to the caller.
#[utoipa::path(
    get,
    path = "/anonces/{id}/details",
    tag = "anonces",
    params(
        ("id" = String, Path, description = "Anonce ID (UUID)")
    ),
    responses(
        (status = 200, description = "Anonce with comments", body = AnonceDetails),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Anonce not found")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn details(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<AnonceDetails>>, ApiError> {
    let details = AnonceService::new(&state.db)
        .details(&claims.user_id, &id.to_string())
        .await?;
    Ok(Json(ApiResponse::new(details)))
}

/// DELETE /anonces/:id - Delete an anonce (admin only).
#[utoipa::path(
    delete,
    path = "/anonces/{id}",
    tag = "anonces",
    params(
        ("id" = String, Path, description = "Anonce ID (UUID)")
    ),
    responses(
        (status = 200, description = "Deleted anonce", body = AnonceWithAuthor),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Anonce not found")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn delete_anonce(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<AnonceWithAuthor>>, ApiError> {
    let anonce = AnonceService::new(&state.db)
        .remove(&claims.user_id, &id.to_string())
        .await?;
    Ok(Json(ApiResponse::new(anonce)))
}
