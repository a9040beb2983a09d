//! TCP listener for the voting service.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use super::message::{read_raw_frame, write_frame, ErrorKind, Reply, RpcRequest, RpcResponse};
use crate::config::VotingConfig;
use crate::db::Database;
use crate::{AnonceError, Result};

/// Voting service that accepts message-pattern RPC connections.
pub struct RpcServer {
    listener: TcpListener,
    semaphore: Arc<Semaphore>,
    max_connections: usize,
    db: Database,
}

impl RpcServer {
    /// Create a new RpcServer bound to the configured address.
    pub async fn bind(config: &VotingConfig, db: Database) -> Result<Self> {
        let listener = TcpListener::bind(config.addr()).await?;
        let local_addr = listener.local_addr()?;

        info!("Voting service listening on {}", local_addr);

        Ok(Self {
            listener,
            semaphore: Arc::new(Semaphore::new(config.max_connections)),
            max_connections: config.max_connections,
            db,
        })
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Get the maximum number of connections allowed.
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Get the number of active connections.
    pub fn active_connections(&self) -> usize {
        self.max_connections - self.semaphore.available_permits()
    }

    /// Accept a new connection.
    ///
    /// Waits for a free connection slot before accepting.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr, ConnectionPermit)> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AnonceError::Io(std::io::Error::other("semaphore closed")))?;

        let (stream, addr) = self.listener.accept().await?;
        debug!("Accepted connection from {}", addr);

        Ok((stream, addr, ConnectionPermit { _permit: permit }))
    }

    /// Run the server, serving each connection on its own task.
    pub async fn run(self) -> Result<()> {
        loop {
            match self.accept().await {
                Ok((stream, addr, permit)) => {
                    let db = self.db.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, &db).await {
                            warn!("Connection {} closed with error: {}", addr, e);
                        }
                        debug!("Connection {} closed", addr);
                        drop(permit);
                    });
                }
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    /// Spawn the server on the runtime and return its bound address.
    pub fn spawn(self) -> Result<SocketAddr> {
        let addr = self.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                error!("Voting service error: {}", e);
            }
        });
        Ok(addr)
    }
}

/// A permit that represents an active connection slot.
///
/// Dropping it releases the slot.
pub struct ConnectionPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
}

/// Serve request frames in order until the peer closes the connection.
///
/// Undecodable frames get a `bad_request` reply; only transport errors and
/// oversized frames end the connection.
async fn serve_connection(stream: TcpStream, db: &Database) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    while let Some(frame) = read_raw_frame(&mut reader).await? {
        let response = match serde_json::from_slice::<RpcRequest>(&frame) {
            Ok(request) => RpcResponse {
                id: request.id,
                reply: crate::vote::dispatch(db, &request.pattern, request.data).await,
            },
            Err(e) => {
                debug!("Rejecting undecodable frame: {}", e);
                RpcResponse {
                    id: frame_id(&frame),
                    reply: Reply::fail(ErrorKind::BadRequest, format!("Invalid request: {e}")),
                }
            }
        };
        write_frame(&mut write_half, &response).await?;
    }

    Ok(())
}

/// Best-effort correlation id of a frame that is not a valid request.
fn frame_id(frame: &[u8]) -> u64 {
    serde_json::from_slice::<Value>(frame)
        .ok()
        .and_then(|value| value.get("id").and_then(Value::as_u64))
        .unwrap_or(0)
}
