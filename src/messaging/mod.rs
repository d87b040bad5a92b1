//! # Messaging Collaborator
//!
//! The session consumes the secure-messaging protocol through this trait and
//! nothing else: `push` to send, `pull` to fetch, plus two accessors used
//! only for title-bar text. Protocol internals (authentication, encryption,
//! transport) live behind the implementation and are out of scope here.

pub mod client;

pub use client::PssstClient;

use std::fmt;

use async_trait::async_trait;

/// Errors from `push`/`pull`. All of them are recoverable from the session's
/// point of view: they surface as an `Error: <cause>` transcript line and the
/// loop continues.
#[derive(Debug)]
pub enum TransportError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The server returned an error response.
    Api { status: u16, message: String },
    /// Failed to parse the server's response.
    Parse(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            TransportError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

/// The two message-moving operations the chat client is built on, plus the
/// accessors that feed the title bar.
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Canonical user address of this session (e.g. `pssst.alice`).
    fn identity(&self) -> &str;

    /// Endpoint the client talks to, for display only.
    fn endpoint(&self) -> &str;

    /// Sends one message to the receiver.
    async fn push(&self, receiver: &str, message: &str) -> Result<(), TransportError>;

    /// Fetches all messages queued for this profile since the last pull.
    /// May return an empty list.
    async fn pull(&self) -> Result<Vec<Vec<u8>>, TransportError>;
}
