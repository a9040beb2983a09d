//! OpenAPI document for the gateway.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::board::{
    Anonce, AnonceDetails, AnonceWithAuthor, CommentWithAuthor, ReadRecord, ReadWithAnonce,
    ReadWithUser,
};
use crate::db::{Role, UserSummary};
use crate::vote::{
    Candidate, CandidateInput, CandidateName, CandidateResult, CastVoteRequest,
    CreateVoteRequest, SetActiveRequest, Vote, VoteData, VoteListItem, VoteRecord,
    VoteWithCandidates, Voter,
};
use crate::web::dto::{
    AnonceRequest, CommentRequest, MessageResponse, SigninRequest, SigninResponse, SignupRequest,
    UserResponse,
};
use crate::web::error::{ErrorBody, ErrorCode, ErrorDetail};
use crate::web::handlers;

/// Registers the bearer header and the `access_token` cookie schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("access_token"))),
            );
        }
    }
}

/// Gateway API description served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Anonce API",
        description = "Announcement board, user accounts and votes"
    ),
    paths(
        handlers::auth::signup,
        handlers::auth::signin,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::user::list_users,
        handlers::user::delete_user,
        handlers::anonce::create_or_edit_anonce,
        handlers::anonce::list_anonces,
        handlers::anonce::get_anonce,
        handlers::anonce::mark_as_read,
        handlers::anonce::read_by_user,
        handlers::anonce::readers,
        handlers::anonce::comment,
        handlers::anonce::details,
        handlers::anonce::delete_anonce,
        handlers::vote::create_vote,
        handlers::vote::cast_vote,
        handlers::vote::results,
        handlers::vote::list_votes,
        handlers::vote::voters,
        handlers::vote::set_active,
        handlers::vote::delete_vote,
    ),
    components(schemas(
        Role,
        UserSummary,
        UserResponse,
        SignupRequest,
        SigninRequest,
        SigninResponse,
        MessageResponse,
        Anonce,
        AnonceWithAuthor,
        AnonceDetails,
        AnonceRequest,
        CommentRequest,
        CommentWithAuthor,
        ReadRecord,
        ReadWithAnonce,
        ReadWithUser,
        Vote,
        Candidate,
        CandidateInput,
        CandidateName,
        CandidateResult,
        CreateVoteRequest,
        CastVoteRequest,
        SetActiveRequest,
        VoteRecord,
        VoteWithCandidates,
        VoteData,
        VoteListItem,
        Voter,
        ErrorBody,
        ErrorDetail,
        ErrorCode,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup, signin and session"),
        (name = "users", description = "User accounts"),
        (name = "anonces", description = "Announcements, comments and read receipts"),
        (name = "votes", description = "Votes, proxied to the voting service")
    )
)]
pub struct ApiDoc;
