//! Transport seam between the session engine and the store service.

pub mod http;

pub use http::HttpStoreClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::device::DeviceIdentity;
use crate::session::CredentialBundle;

/// What a successful authentication exchange negotiated.
///
/// `identity` is the identity the service actually bound the session to;
/// it may differ from the one sent (the service corrects casing, resolves
/// aliases, or supplies the account for app-provided logins).
#[derive(Debug, Clone)]
pub struct WireSession {
    pub identity: String,
    pub device_session_id: String,
    pub session_token: String,
}

/// Errors crossing the transport boundary.
///
/// Carries enough structure (HTTP-like status, nested cause chain) for the
/// builder to classify each failure exactly once.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The exchange did not complete at the transport level.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a rejection status.
    #[error("service answered {status}: {message}")]
    Status { status: u16, message: String },

    /// The bootstrap token source failed to yield a usable token.
    #[error("token source {source}: {message}")]
    TokenSource {
        source: String,
        message: String,
        #[source]
        cause: Option<reqwest::Error>,
    },
}

/// Capability to run one authentication exchange against the store service.
///
/// Implementations perform exactly one exchange sequence per call and
/// surface every failure as a [`ProtocolError`]; retrying belongs to the
/// session engine.
#[async_trait]
pub trait StoreClient: Send + Sync {
    async fn authenticate(
        &self,
        bundle: &CredentialBundle,
        device: &DeviceIdentity,
    ) -> Result<WireSession, ProtocolError>;
}

/// Whether an error chain roots in a transport-level network condition
/// (DNS resolution, TLS handshake, connect/reset, timeout).
///
/// Walks the `source()` chain to the root so wrapped errors classify the
/// same as bare ones.
pub fn is_network_rooted(err: &reqwest::Error) -> bool {
    if err.is_connect() || err.is_timeout() {
        return true;
    }
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if is_network_io_kind(io.kind()) {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

fn is_network_io_kind(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind;
    matches!(
        kind,
        ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::TimedOut
            | ErrorKind::UnexpectedEof
            | ErrorKind::AddrNotAvailable
    )
}
