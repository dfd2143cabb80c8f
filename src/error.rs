//! Typed failures returned by every store operation.
//!
//! Errors are values, never panics: the UI layer renders them inline and
//! decides whether the user retries. Nothing in the core retries on its own.

use thiserror::Error;

/// All failure kinds the synchronization core can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A draft failed local pre-flight checks. Never reaches the network.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Invalid credentials or an expired/missing token. The message never
    /// reveals which credential was wrong.
    #[error("authentication failed")]
    Auth,

    /// Transport failure or timeout reported by the HTTP collaborator.
    #[error("network error: {0}")]
    Network(String),

    /// A single-flight guard rejected a duplicate invocation.
    #[error("operation already in progress")]
    ConcurrentOperation,

    /// The identifier is stale: deleted content or an expired share id.
    #[error("not found")]
    NotFound,

    /// Unclassified server-side failure (5xx-equivalent).
    #[error("server error: {0}")]
    Server(String),
}
