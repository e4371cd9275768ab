use thiserror::Error;

/// Why the store service turned an attempt away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The presented session token is no longer accepted (401-equivalent).
    StaleToken,
    /// Identity or secret rejected outright.
    BadCredentials,
    /// The bundle had nothing to authenticate with. Detected locally,
    /// never sent over the network.
    MissingCredentials,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::StaleToken => "stale session token",
            Self::BadCredentials => "bad credentials",
            Self::MissingCredentials => "missing credentials",
        };
        f.write_str(text)
    }
}

/// Classified outcome of a single build attempt.
///
/// Produced once at the transport boundary; the retry loop branches on the
/// variant and never re-inspects causes.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Transport-level failure (DNS, TLS, connect, reset, timeout).
    /// Rotating token sources cannot help, so this is never retried here.
    #[error("network unreachable: {0}")]
    Network(String),

    /// The store service rejected the credentials or token.
    #[error("authentication rejected: {0}")]
    Rejected(RejectionReason),

    /// The bootstrap source answered but did not yield a usable token.
    #[error("token source {source_url} yielded no usable token: {message}")]
    TokenSource { source_url: String, message: String },

    /// Contradictory builder state. Programmer error, fatal to the
    /// sequence, not a user-facing condition.
    #[error("session builder misconfigured: {0}")]
    Misconfigured(String),
}

impl BuildError {
    /// Whether the retry loop may absorb this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Rejected(_) | Self::TokenSource { .. })
    }
}

/// Caller-facing authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No stored identity; detected locally before any network activity.
    #[error("no stored identity")]
    CredentialsEmpty,

    /// Transport-level failure, surfaced immediately without retry.
    #[error("network unreachable: {0}")]
    Network(String),

    /// The retry budget was spent; `last` is the failure of the final
    /// attempt.
    #[error("authentication failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: BuildError },

    /// Persisted-state read or write failure.
    #[error("credential storage: {0}")]
    Storage(String),

    /// Programmer error surfaced defensively; not an expected condition.
    #[error("internal: {0}")]
    Internal(String),
}
