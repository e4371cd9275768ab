use std::sync::Arc;

use tracing::debug;

use super::bundle::CredentialBundle;
use super::error::{BuildError, RejectionReason};
use super::handle::SessionHandle;
use super::sources::TokenSourcePool;
use crate::client::{is_network_rooted, ProtocolError, StoreClient};
use crate::device::DeviceIdentity;

/// Performs one attempt to obtain a validated session handle.
///
/// The builder owns no retry logic: it resolves a bootstrap source when
/// the bundle names none, runs exactly one exchange through the
/// [`StoreClient`], and classifies the outcome. Negotiated values are
/// written back into the bundle so the next attempt (or the persistence
/// step) sees them.
pub struct SessionBuilder {
    client: Arc<dyn StoreClient>,
}

impl SessionBuilder {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self { client }
    }

    pub async fn build(
        &self,
        bundle: &mut CredentialBundle,
        device: &DeviceIdentity,
        sources: &mut TokenSourcePool,
    ) -> Result<SessionHandle, BuildError> {
        if !bundle.has_material() {
            // Local precondition; this never reaches the network.
            return Err(BuildError::Rejected(RejectionReason::MissingCredentials));
        }

        if bundle.bootstrap_source_url.is_none() {
            let source = sources
                .draw()
                .ok_or_else(|| BuildError::Misconfigured("token source pool is empty".to_string()))?;
            debug!(%source, "bootstrap source drawn");
            bundle.bootstrap_source_url = Some(source);
        }

        let wire = self
            .client
            .authenticate(bundle, device)
            .await
            .map_err(classify)?;

        bundle.identity = Some(wire.identity.clone());
        bundle.device_session_id = Some(wire.device_session_id.clone());
        bundle.session_token = Some(wire.session_token.clone());

        Ok(SessionHandle {
            identity: wire.identity,
            device_session_id: wire.device_session_id,
            session_token: wire.session_token,
            locale: bundle.locale.clone(),
        })
    }
}

/// Map a transport failure into the closed per-attempt taxonomy.
///
/// This is the single place where cause chains are inspected; the retry
/// loop only ever sees the classified variant.
fn classify(err: ProtocolError) -> BuildError {
    match err {
        // Everything transport-level escapes as a network condition; the
        // caller decides whether to try again later.
        ProtocolError::Transport(err) => BuildError::Network(err.to_string()),
        ProtocolError::Status { status, message } => {
            let reason = if status == 401 {
                RejectionReason::StaleToken
            } else {
                RejectionReason::BadCredentials
            };
            debug!(status, %reason, message = %message, "authentication rejected");
            BuildError::Rejected(reason)
        }
        ProtocolError::TokenSource {
            source,
            message,
            cause,
        } => match cause {
            Some(cause) if is_network_rooted(&cause) => BuildError::Network(cause.to_string()),
            _ => BuildError::TokenSource {
                source_url: source,
                message,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_classifies_as_stale_token() {
        let err = classify(ProtocolError::Status {
            status: 401,
            message: "token expired".to_string(),
        });
        assert!(matches!(
            err,
            BuildError::Rejected(RejectionReason::StaleToken)
        ));
    }

    #[test]
    fn other_rejection_statuses_classify_as_bad_credentials() {
        for status in [400, 403] {
            let err = classify(ProtocolError::Status {
                status,
                message: String::new(),
            });
            assert!(matches!(
                err,
                BuildError::Rejected(RejectionReason::BadCredentials)
            ));
        }
    }

    #[test]
    fn token_source_failure_without_network_cause_stays_token_source() {
        let err = classify(ProtocolError::TokenSource {
            source: "https://token.example/grant".to_string(),
            message: "empty token".to_string(),
            cause: None,
        });
        match err {
            BuildError::TokenSource { source_url: source, .. } => {
                assert_eq!(source, "https://token.example/grant");
            }
            other => panic!("expected TokenSource, got {other:?}"),
        }
    }
}
