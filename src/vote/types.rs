//! Vote types shared by the voting service and the gateway.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::UserSummary;

/// A poll with a set of candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    /// Vote ID (UUID).
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Whether ballots are accepted.
    pub active: bool,
    /// Admin who created the vote.
    pub created_by_id: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// An option of a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Candidate ID (UUID).
    pub id: String,
    /// Owning vote.
    pub vote_id: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
}

/// A ballot: one per (user, vote).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    /// Record ID (UUID).
    pub id: String,
    /// Voter.
    pub user_id: String,
    /// Vote.
    pub vote_id: String,
    /// Chosen candidate.
    pub candidate_id: String,
    /// Timestamp of the ballot.
    pub created_at: String,
}

/// A vote with its candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteWithCandidates {
    /// Vote ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Whether ballots are accepted.
    pub active: bool,
    /// Admin who created the vote.
    pub created_by_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Candidates in creation order.
    pub candidates: Vec<Candidate>,
}

impl VoteWithCandidates {
    /// Attach candidates to a vote.
    pub fn new(vote: Vote, candidates: Vec<Candidate>) -> Self {
        Self {
            id: vote.id,
            title: vote.title,
            description: vote.description,
            active: vote.active,
            created_by_id: vote.created_by_id,
            created_at: vote.created_at,
            candidates,
        }
    }
}

/// A vote as listed to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteData {
    /// Vote ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Whether ballots are accepted.
    pub active: bool,
    /// Admin who created the vote.
    pub created_by_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Creator identity.
    pub created_by: UserSummary,
    /// Candidates in creation order.
    pub candidates: Vec<Candidate>,
}

/// One entry of the vote list: the vote and the caller's ballot, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoteListItem {
    /// The vote.
    pub vote_data: VoteData,
    /// The caller's ballot on this vote.
    pub user_vote: Option<VoteRecord>,
}

/// Tally for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CandidateResult {
    /// Candidate ID.
    pub id: String,
    /// Candidate name.
    pub name: String,
    /// Number of ballots.
    pub count: i64,
}

/// Name of the candidate a voter chose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CandidateName {
    /// Candidate name.
    pub name: String,
}

/// A ballot with its voter and chosen candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    /// Record ID.
    pub id: String,
    /// Voter ID.
    pub user_id: String,
    /// Vote ID.
    pub vote_id: String,
    /// Chosen candidate ID.
    pub candidate_id: String,
    /// Timestamp of the ballot.
    pub created_at: String,
    /// Voter identity.
    pub user: UserSummary,
    /// Chosen candidate.
    pub candidate: CandidateName,
}

/// Candidate to create with a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CandidateInput {
    /// Display name.
    #[validate(length(min = 1, max = 200, message = "Candidate name must not be empty"))]
    pub name: String,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
}

/// Vote creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVoteRequest {
    /// Title.
    #[validate(length(min = 1, max = 200, message = "Title must not be empty"))]
    pub title: String,
    /// Description.
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    /// Candidates, at least one.
    #[validate(length(min = 1, message = "At least one candidate is required"), nested)]
    pub candidates: Vec<CandidateInput>,
}

/// Ballot request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    /// Vote to cast on.
    #[validate(length(min = 1))]
    pub vote_id: String,
    /// Chosen candidate.
    #[validate(length(min = 1))]
    pub candidate_id: String,
    /// The voter's account password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Open/close request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetActiveRequest {
    /// Vote to update.
    #[validate(length(min = 1))]
    pub vote_id: String,
    /// New state.
    pub is_active: bool,
}

/// Payload acting on behalf of a user: `{userId, ...body}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authored<T> {
    /// Acting user.
    pub user_id: String,
    /// Operation body, flattened into the same object.
    #[serde(flatten)]
    pub body: T,
}

impl<T> Authored<T> {
    /// Wrap a body with the acting user.
    pub fn new(user_id: impl Into<String>, body: T) -> Self {
        Self {
            user_id: user_id.into(),
            body,
        }
    }
}

/// Reference to a vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRef {
    /// Vote ID.
    pub vote_id: String,
}

impl VoteRef {
    /// Reference a vote by id.
    pub fn new(vote_id: impl Into<String>) -> Self {
        Self {
            vote_id: vote_id.into(),
        }
    }
}

/// Filter for the vote list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    /// Active state non-admin users see.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authored_flattens_body() {
        let payload = Authored::new(
            "u1",
            SetActiveRequest {
                vote_id: "v1".to_string(),
                is_active: true,
            },
        );
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({"userId": "u1", "voteId": "v1", "isActive": true})
        );

        let decoded: Authored<SetActiveRequest> = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn test_create_vote_request_requires_candidates() {
        let request = CreateVoteRequest {
            title: "Board election".to_string(),
            description: String::new(),
            candidates: vec![],
        };
        assert!(request.validate().is_err());

        let request = CreateVoteRequest {
            candidates: vec![CandidateInput {
                name: "Alice".to_string(),
                description: String::new(),
            }],
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_vote_request_validates_nested_candidates() {
        let request = CreateVoteRequest {
            title: "Board election".to_string(),
            description: String::new(),
            candidates: vec![CandidateInput {
                name: String::new(),
                description: String::new(),
            }],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_vote_list_item_shape() {
        let item = VoteListItem {
            vote_data: VoteData {
                id: "v1".to_string(),
                title: "T".to_string(),
                description: String::new(),
                active: true,
                created_by_id: "a1".to_string(),
                created_at: "2024-01-01 00:00:00".to_string(),
                created_by: UserSummary {
                    id: "a1".to_string(),
                    name: "Admin".to_string(),
                    email: "admin@example.com".to_string(),
                },
                candidates: vec![],
            },
            user_vote: None,
        };
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["voteData"]["createdBy"]["name"], "Admin");
        assert!(value["userVote"].is_null());
    }
}
