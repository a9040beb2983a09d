//! Gateway-side client for the voting service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::message::{patterns, read_frame, write_frame, RpcRequest, RpcResponse};
use crate::config::VotingConfig;
use crate::vote::{
    ActiveFilter, Authored, CandidateResult, CastVoteRequest, CreateVoteRequest, SetActiveRequest,
    Vote, VoteListItem, VoteRecord, VoteRef, VoteWithCandidates, Voter,
};
use crate::{AnonceError, Result};

/// Client that sends one request per connection to the voting service.
#[derive(Debug)]
pub struct VoteClient {
    addr: String,
    timeout: Duration,
    next_id: AtomicU64,
}

impl VoteClient {
    /// Create a client for the given address.
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a client from the voting configuration.
    pub fn from_config(config: &VotingConfig) -> Self {
        Self::new(
            config.addr(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Address of the voting service.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send a request and decode the reply data.
    ///
    /// Transport failures and timeouts become [`AnonceError::Rpc`]; failure
    /// replies become [`AnonceError::Remote`].
    pub async fn call<T, P>(&self, pattern: &str, payload: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(id, pattern, payload)?;

        let response = timeout(self.timeout, self.exchange(&request))
            .await
            .map_err(|_| {
                warn!(pattern, "Voting service request timed out");
                AnonceError::Rpc(format!("request {pattern} timed out"))
            })??;

        if response.id != id {
            return Err(AnonceError::Rpc(format!(
                "response id {} does not match request id {id}",
                response.id
            )));
        }

        response.reply.into_result()
    }

    async fn exchange(&self, request: &RpcRequest) -> Result<RpcResponse> {
        debug!(pattern = %request.pattern, id = request.id, "Sending vote request");
        let stream = TcpStream::connect(&self.addr).await.map_err(|e| {
            warn!("Voting service unreachable at {}: {}", self.addr, e);
            AnonceError::Rpc(format!("voting service unreachable: {e}"))
        })?;
        let (read_half, mut write_half) = stream.into_split();

        write_frame(&mut write_half, request).await?;

        let mut reader = BufReader::new(read_half);
        read_frame(&mut reader)
            .await?
            .ok_or_else(|| AnonceError::Rpc("connection closed before reply".to_string()))
    }

    /// `vote.create`
    pub async fn create_vote(
        &self,
        user_id: &str,
        request: CreateVoteRequest,
    ) -> Result<VoteWithCandidates> {
        self.call(patterns::CREATE, Authored::new(user_id, request))
            .await
    }

    /// `vote.find_all`
    pub async fn find_all(&self, user_id: &str, is_active: bool) -> Result<Vec<VoteListItem>> {
        self.call(
            patterns::FIND_ALL,
            Authored::new(user_id, ActiveFilter { is_active }),
        )
        .await
    }

    /// `vote.cast`
    pub async fn cast_vote(&self, user_id: &str, request: CastVoteRequest) -> Result<VoteRecord> {
        self.call(patterns::CAST, Authored::new(user_id, request))
            .await
    }

    /// `vote.results`
    pub async fn results(&self, vote_id: &str) -> Result<Vec<CandidateResult>> {
        self.call(patterns::RESULTS, VoteRef::new(vote_id)).await
    }

    /// `vote.voters`
    pub async fn voters(&self, vote_id: &str) -> Result<Vec<Voter>> {
        self.call(patterns::VOTERS, VoteRef::new(vote_id)).await
    }

    /// `vote.set_active`
    pub async fn set_active(&self, user_id: &str, request: SetActiveRequest) -> Result<Vote> {
        self.call(patterns::SET_ACTIVE, Authored::new(user_id, request))
            .await
    }

    /// `vote.delete`
    pub async fn remove(&self, user_id: &str, vote_id: &str) -> Result<Vote> {
        self.call(patterns::DELETE, Authored::new(user_id, VoteRef::new(vote_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{ErrorKind, Reply, RpcServer};
    use crate::Database;
    use tokio::net::TcpListener;

    fn test_config() -> VotingConfig {
        VotingConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_connections: 4,
            request_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_rpc_error() {
        // Bind and drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = VoteClient::new(addr.to_string(), Duration::from_secs(1));
        let result = client.results("v1").await;

        assert!(matches!(result, Err(AnonceError::Rpc(_))));
    }

    #[tokio::test]
    async fn test_silent_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = VoteClient::new(addr.to_string(), Duration::from_millis(100));
        let result = client.results("v1").await;

        match result {
            Err(AnonceError::Rpc(msg)) => assert!(msg.contains("timed out")),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failure_reply_is_remote_error() {
        let db = Database::open_in_memory().await.unwrap();
        let addr = RpcServer::bind(&test_config(), db)
            .await
            .unwrap()
            .spawn()
            .unwrap();

        let client = VoteClient::new(addr.to_string(), Duration::from_secs(5));
        let result = client.voters("missing").await;

        match result {
            Err(AnonceError::Remote { kind, .. }) => assert_eq!(kind, ErrorKind::NotFound),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mismatched_response_id() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut reader = BufReader::new(read_half);
            let _request: Option<RpcRequest> = read_frame(&mut reader).await.unwrap();
            let response = RpcResponse {
                id: 999,
                reply: Reply::ok(Vec::<CandidateResult>::new()),
            };
            write_frame(&mut write_half, &response).await.unwrap();
        });

        let client = VoteClient::new(addr.to_string(), Duration::from_secs(5));
        assert!(matches!(
            client.results("v1").await,
            Err(AnonceError::Rpc(_))
        ));
    }
}
