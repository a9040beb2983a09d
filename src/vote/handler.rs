//! Message-pattern dispatch for the voting service.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::service::VoteService;
use super::types::{ActiveFilter, Authored, CastVoteRequest, CreateVoteRequest, SetActiveRequest, VoteRef};
use crate::db::Database;
use crate::rpc::{patterns, ErrorKind, Reply};

/// Route a request to the vote service and wrap the outcome in a reply.
pub async fn dispatch(db: &Database, pattern: &str, data: Value) -> Reply {
    debug!(pattern, "Dispatching vote request");
    let service = VoteService::new(db);

    match pattern {
        patterns::CREATE => match decode::<Authored<CreateVoteRequest>>(data) {
            Ok(p) => Reply::from_result(service.create_vote(&p.user_id, &p.body).await),
            Err(reply) => reply,
        },
        patterns::FIND_ALL => match decode::<Authored<ActiveFilter>>(data) {
            Ok(p) => Reply::from_result(service.find_all(&p.user_id, p.body.is_active).await),
            Err(reply) => reply,
        },
        patterns::CAST => match decode::<Authored<CastVoteRequest>>(data) {
            Ok(p) => match service.cast_vote(&p.user_id, &p.body).await {
                Ok(record) => Reply::ok(record).with_message("Vote recorded"),
                Err(e) => Reply::from_error(&e),
            },
            Err(reply) => reply,
        },
        patterns::DELETE => match decode::<Authored<VoteRef>>(data) {
            Ok(p) => Reply::from_result(service.remove(&p.user_id, &p.body.vote_id).await),
            Err(reply) => reply,
        },
        patterns::RESULTS => match decode::<VoteRef>(data) {
            Ok(p) => Reply::from_result(service.results(&p.vote_id).await),
            Err(reply) => reply,
        },
        patterns::VOTERS => match decode::<VoteRef>(data) {
            Ok(p) => Reply::from_result(service.voters(&p.vote_id).await),
            Err(reply) => reply,
        },
        patterns::SET_ACTIVE => match decode::<Authored<SetActiveRequest>>(data) {
            Ok(p) => Reply::from_result(
                service
                    .set_active(&p.user_id, &p.body.vote_id, p.body.is_active)
                    .await,
            ),
            Err(reply) => reply,
        },
        other => Reply::fail(ErrorKind::BadRequest, format!("Unknown pattern: {other}")),
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, Reply> {
    serde_json::from_value(data)
        .map_err(|e| Reply::fail(ErrorKind::BadRequest, format!("Invalid payload: {e}")))
}
