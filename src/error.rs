//! .

use nix::errno::Errno;
use std::{collections::TryReserveError, path::PathBuf};

use crate::protocol::CommandTag;

pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Failures of the socket primitives. Each carries the OS error code where one exists.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to create socket: {0}")]
    SocketCreate(Errno),
    #[error("Failed to connect to {}: {source}", path.display())]
    Connect { path: PathBuf, source: Errno },
    #[error("Send failed: {0}")]
    Send(Errno),
    #[error("Send made no progress")]
    WriteZero,
    #[error("Peer closed the connection")]
    Closed,
    #[error("Read failed: {0}")]
    Read(Errno),
    #[error("Read timed out")]
    TimedOut,
    #[error("Read buffer must not be empty")]
    InvalidArgument,
    #[error("Failed to set socket timeout: {0}")]
    TimeoutConfig(Errno),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Socket file not found: {} (is the service running?)", .0.display())]
    SocketMissing(PathBuf),
    #[error("Channel is {0}, expected {1}")]
    InvalidState(&'static str, &'static str),
    #[error("Connect failed: {0}")]
    Connect(#[source] TransportError),
    #[error("Timeout configuration failed: {0}")]
    TimeoutConfig(#[source] TransportError),
    #[error("Send failed: {0}")]
    Send(#[source] TransportError),
    #[error("Receive failed: {0}")]
    Receive(#[source] TransportError),
    #[error("Failed to encode message: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("Failed to decode reply: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Reply buffer could not grow: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("Message is bound to tag {expected}, not {actual}")]
    TagMismatch {
        expected: CommandTag,
        actual: CommandTag,
    },
    #[error("Command index {0} is outside 0..=9999")]
    TagOutOfRange(u16),
}

impl ClientError {
    /// True when the request never left this process.
    pub fn before_send(&self) -> bool {
        !matches!(self, ClientError::Receive(_) | ClientError::Decode(_) | ClientError::OutOfMemory(_))
    }
}
