//! Wire messages for the voting RPC transport.
//!
//! Every frame is one JSON document terminated by `\n`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::error;
use utoipa::ToSchema;

use crate::{AnonceError, Result};

/// Maximum accepted frame size in bytes.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Message patterns understood by the voting service.
pub mod patterns {
    /// Create a vote with its candidates.
    pub const CREATE: &str = "vote.create";
    /// List votes visible to a user.
    pub const FIND_ALL: &str = "vote.find_all";
    /// Cast a ballot.
    pub const CAST: &str = "vote.cast";
    /// Delete a vote.
    pub const DELETE: &str = "vote.delete";
    /// Per-candidate tallies.
    pub const RESULTS: &str = "vote.results";
    /// Ballots with their voters.
    pub const VOTERS: &str = "vote.voters";
    /// Open or close a vote.
    pub const SET_ACTIVE: &str = "vote.set_active";

    /// Every known pattern.
    pub const ALL: &[&str] = &[CREATE, FIND_ALL, CAST, DELETE, RESULTS, VOTERS, SET_ACTIVE];
}

/// Machine-readable failure category carried in a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller lacks the required role.
    Forbidden,
    /// Referenced entity does not exist.
    NotFound,
    /// Operation conflicts with current state.
    Conflict,
    /// Malformed or invalid payload.
    BadRequest,
    /// Credentials did not match.
    Unauthorized,
    /// Unexpected failure on the service side.
    Internal,
}

impl From<&AnonceError> for ErrorKind {
    fn from(err: &AnonceError) -> Self {
        match err {
            AnonceError::Permission(_) => ErrorKind::Forbidden,
            AnonceError::NotFound(_) => ErrorKind::NotFound,
            AnonceError::Conflict(_) => ErrorKind::Conflict,
            AnonceError::Validation(_) => ErrorKind::BadRequest,
            AnonceError::Auth(_) => ErrorKind::Unauthorized,
            AnonceError::Remote { kind, .. } => *kind,
            _ => ErrorKind::Internal,
        }
    }
}

/// Request frame sent by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Correlation id echoed in the response.
    pub id: u64,
    /// Message pattern, one of [`patterns::ALL`].
    pub pattern: String,
    /// Pattern-specific payload.
    #[serde(default)]
    pub data: Value,
}

impl RpcRequest {
    /// Build a request with a serialized payload.
    pub fn new(id: u64, pattern: &str, data: impl Serialize) -> Result<Self> {
        let data = serde_json::to_value(data)
            .map_err(|e| AnonceError::Rpc(format!("failed to encode payload: {e}")))?;
        Ok(Self {
            id,
            pattern: pattern.to_string(),
            data,
        })
    }
}

/// Response frame sent by the voting service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Id of the request this answers.
    pub id: u64,
    /// Outcome envelope.
    pub reply: Reply,
}

/// Outcome envelope: `{success, data?, message?, error?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Result payload on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl Reply {
    /// Successful reply carrying data.
    pub fn ok(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                message: None,
                error: None,
            },
            Err(e) => {
                error!("Failed to encode reply data: {}", e);
                Self::fail(ErrorKind::Internal, "An internal error occurred")
            }
        }
    }

    /// Attach a message to the reply.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Failed reply.
    pub fn fail(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: Some(kind),
        }
    }

    /// Failed reply derived from a service error.
    ///
    /// Internal failures are logged here and replaced by a generic message.
    pub fn from_error(err: &AnonceError) -> Self {
        let kind = ErrorKind::from(err);
        if kind == ErrorKind::Internal {
            error!("Voting service error: {}", err);
            return Self::fail(kind, "An internal error occurred");
        }
        Self::fail(kind, err.public_message())
    }

    /// Convert a service result into a reply.
    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::from_error(&e),
        }
    }

    /// Decode a reply into typed data, turning failures into errors.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        if !self.success {
            return Err(AnonceError::Remote {
                kind: self.error.unwrap_or(ErrorKind::Internal),
                message: self
                    .message
                    .unwrap_or_else(|| "voting service request failed".to_string()),
            });
        }

        serde_json::from_value(self.data.unwrap_or(Value::Null))
            .map_err(|e| AnonceError::Rpc(format!("unexpected reply payload: {e}")))
    }
}

/// Read the raw bytes of one non-blank frame, without the trailing newline.
///
/// At most `MAX_FRAME_LEN + 1` bytes are buffered per frame; a longer line
/// is an error and leaves the stream unusable. Returns `None` at end of stream.
pub async fn read_raw_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = (&mut *reader)
            .take(MAX_FRAME_LEN as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await?;
        if n == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        } else if n > MAX_FRAME_LEN {
            return Err(AnonceError::Rpc(format!(
                "frame exceeds {MAX_FRAME_LEN} bytes"
            )));
        }
        if !buf.iter().all(u8::is_ascii_whitespace) {
            return Ok(Some(buf));
        }
    }
}

/// Read one frame. Returns `None` at end of stream.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    match read_raw_frame(reader).await? {
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| AnonceError::Rpc(format!("malformed frame: {e}"))),
        None => Ok(None),
    }
}

/// Write one frame and flush.
pub async fn write_frame<W, T>(writer: &mut W, frame: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut buf = serde_json::to_vec(frame)
        .map_err(|e| AnonceError::Rpc(format!("failed to encode frame: {e}")))?;
    buf.push(b'\n');
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}
