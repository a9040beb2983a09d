//! Message-pattern RPC transport between the gateway and the voting service.
//!
//! Requests and replies are newline-delimited JSON frames over TCP. The
//! gateway opens one connection per request; the service answers frames in
//! order until the peer hangs up.

mod client;
mod message;
mod server;

pub use client::VoteClient;
pub use message::{
    patterns, read_frame, read_raw_frame, write_frame, ErrorKind, Reply, RpcRequest, RpcResponse,
    MAX_FRAME_LEN,
};
pub use server::{ConnectionPermit, RpcServer};
