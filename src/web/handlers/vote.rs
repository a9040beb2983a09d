//! Vote handlers for Web API.
//!
//! Every handler forwards to the voting service through [`VoteClient`].
//!
//! [`VoteClient`]: crate::rpc::VoteClient

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::vote::{
    CandidateResult, CastVoteRequest, CreateVoteRequest, SetActiveRequest, Vote, VoteListItem,
    VoteRecord, VoteWithCandidates, Voter,
};
use crate::web::dto::{ApiResponse, UuidPath, ValidatedJson, VotesQuery};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /votes - Create a vote (admin only).
#[utoipa::path(
    post,
    path = "/votes",
    tag = "votes",
    request_body = CreateVoteRequest,
    responses(
        (status = 201, description = "Vote created", body = VoteWithCandidates),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 422, description = "Validation error"),
        (status = 503, description = "Voting service unavailable")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn create_vote(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateVoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VoteWithCandidates>>), ApiError> {
    let vote = state.vote_client.create_vote(&claims.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(vote))))
}

/// POST /votes/voter - Cast a ballot.
#[utoipa::path(
    post,
    path = "/votes/voter",
    tag = "votes",
    request_body = CastVoteRequest,
    responses(
        (status = 201, description = "Ballot recorded", body = VoteRecord),
        (status = 400, description = "Candidate does not belong to the vote"),
        (status = 401, description = "Unauthorized or wrong password"),
        (status = 404, description = "User or vote not found"),
        (status = 409, description = "Vote closed or already voted"),
        (status = 503, description = "Voting service unavailable")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<CastVoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VoteRecord>>), ApiError> {
    let record = state.vote_client.cast_vote(&claims.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(record))))
}

/// GET /votes/:id/resultats - Ballot count per candidate.
#[utoipa::path(
    get,
    path = "/votes/{id}/resultats",
    tag = "votes",
    params(
        ("id" = String, Path, description = "Vote ID (UUID)")
    ),
    responses(
        (status = 200, description = "Results", body = Vec<CandidateResult>),
        (status = 404, description = "Vote not found"),
        (status = 503, description = "Voting service unavailable")
    )
)]
pub async fn results(
    State(state): State<Arc<AppState>>,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<Vec<CandidateResult>>>, ApiError> {
    let results = state.vote_client.results(&id.to_string()).await?;
    Ok(Json(ApiResponse::new(results)))
}

/// GET /votes?isActive= - List votes.
#[utoipa::path(
    get,
    path = "/votes",
    tag = "votes",
    params(VotesQuery),
    responses(
        (status = 200, description = "Votes with the caller's ballot", body = Vec<VoteListItem>),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Voting service unavailable")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn list_votes(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<VotesQuery>,
) -> Result<Json<ApiResponse<Vec<VoteListItem>>>, ApiError> {
    let votes = state
        .vote_client
        .find_all(&claims.user_id, query.is_active())
        .await?;
    Ok(Json(ApiResponse::new(votes)))
}

/// GET /votes/:id/votants - Ballots with voter and candidate.
#[utoipa::path(
    get,
    path = "/votes/{id}/votants",
    tag = "votes",
    params(
        ("id" = String, Path, description = "Vote ID (UUID)")
    ),
    responses(
        (status = 200, description = "Voters", body = Vec<Voter>),
        (status = 404, description = "Vote not found"),
        (status = 503, description = "Voting service unavailable")
    )
)]
pub async fn voters(
    State(state): State<Arc<AppState>>,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<Vec<Voter>>>, ApiError> {
    let voters = state.vote_client.voters(&id.to_string()).await?;
    Ok(Json(ApiResponse::new(voters)))
}

/// PATCH /votes/activer - Open or close a vote (admin only).
#[utoipa::path(
    patch,
    path = "/votes/activer",
    tag = "votes",
    request_body = SetActiveRequest,
    responses(
        (status = 200, description = "Updated vote", body = Vote),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Vote not found"),
        (status = 503, description = "Voting service unavailable")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn set_active(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(req): ValidatedJson<SetActiveRequest>,
) -> Result<Json<ApiResponse<Vote>>, ApiError> {
    let vote = state.vote_client.set_active(&claims.user_id, req).await?;
    Ok(Json(ApiResponse::new(vote)))
}

/// DELETE /votes/:id - Delete a vote (admin only).
#[utoipa::path(
    delete,
    path = "/votes/{id}",
    tag = "votes",
    params(
        ("id" = String, Path, description = "Vote ID (UUID)")
    ),
    responses(
        (status = 200, description = "Deleted vote", body = Vote),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Vote not found"),
        (status = 503, description = "Voting service unavailable")
    ),
    security(
        ("bearer_auth" = []),
        ("cookie_auth" = [])
    )
)]
pub async fn delete_vote(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> Result<Json<ApiResponse<Vote>>, ApiError> {
    let vote = state
        .vote_client
        .remove(&claims.user_id, &id.to_string())
        .await?;
    Ok(Json(ApiResponse::new(vote)))
}
