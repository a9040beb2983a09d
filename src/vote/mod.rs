//! Vote module for Anonce.
//!
//! Polls with candidates and one ballot per user, served by the voting
//! microservice over the message-pattern transport in [`crate::rpc`].

mod handler;
mod repository;
mod service;
mod types;

pub use handler::dispatch;
pub use repository::VoteRepository;
pub use service::{VoteService, ALREADY_VOTED};
pub use types::{
    ActiveFilter, Authored, Candidate, CandidateInput, CandidateName, CandidateResult,
    CastVoteRequest, CreateVoteRequest, SetActiveRequest, Vote, VoteData, VoteListItem,
    VoteRecord, VoteRef, VoteWithCandidates, Voter,
};
