use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProtocolError, StoreClient, WireSession};
use crate::device::DeviceIdentity;
use crate::session::CredentialBundle;

const DEFAULT_BASE_URL: &str = "https://store.kioskmirrors.net";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Reference HTTP transport for the store service.
///
/// Draws a short-lived bootstrap token from the bundle's token source when
/// the bundle carries neither a secret nor a session token, then performs
/// one authentication POST. URL setters exist so tests can point the
/// client at a mock server.
///
/// # Example
/// ```no_run
/// use kiosk::client::HttpStoreClient;
///
/// let client = HttpStoreClient::new().with_base_url("https://store.example.org");
/// ```
pub struct HttpStoreClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStoreClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .expect("reqwest client construction cannot fail with static options"),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Fetch a short-lived bootstrap token (and possibly an app-provided
    /// identity) from the named source.
    async fn draw_bootstrap_token(
        &self,
        source: &str,
        identity: Option<&str>,
    ) -> Result<BootstrapGrant, ProtocolError> {
        let mut request = self.client.get(source);
        if let Some(identity) = identity {
            request = request.query(&[("identity", identity)]);
        }
        let response = request.send().await.map_err(|err| ProtocolError::TokenSource {
            source: source.to_string(),
            message: "request failed".to_string(),
            cause: Some(err),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::TokenSource {
                source: source.to_string(),
                message: format!("answered {status}"),
                cause: None,
            });
        }
        let grant: BootstrapGrant =
            response.json().await.map_err(|err| ProtocolError::TokenSource {
                source: source.to_string(),
                message: "invalid token payload".to_string(),
                cause: Some(err),
            })?;
        if grant.token.is_empty() {
            return Err(ProtocolError::TokenSource {
                source: source.to_string(),
                message: "empty token".to_string(),
                cause: None,
            });
        }
        Ok(grant)
    }
}

impl Default for HttpStoreClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreClient for HttpStoreClient {
    async fn authenticate(
        &self,
        bundle: &CredentialBundle,
        device: &DeviceIdentity,
    ) -> Result<WireSession, ProtocolError> {
        let mut identity = bundle.identity.clone();
        let mut bootstrap_token = None;

        if bundle.secret.is_none() && bundle.session_token.is_none() {
            let source =
                bundle
                    .bootstrap_source_url
                    .as_deref()
                    .ok_or_else(|| ProtocolError::TokenSource {
                        source: String::new(),
                        message: "no bootstrap source named".to_string(),
                        cause: None,
                    })?;
            let grant = self.draw_bootstrap_token(source, identity.as_deref()).await?;
            debug!(source, "bootstrap token drawn");
            if identity.is_none() {
                identity = grant.identity;
            }
            bootstrap_token = Some(grant.token);
        }

        let body = AuthRequest {
            identity: identity.as_deref(),
            secret: bundle.secret.as_deref(),
            session_token: bundle.session_token.as_deref(),
            bootstrap_token: bootstrap_token.as_deref(),
            device_session_id: bundle.device_session_id.as_deref(),
            locale: &bundle.locale,
            device,
        };
        let response = self
            .client
            .post(format!("{}/auth/session", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let session: AuthResponse = response.json().await?;
        debug!(identity = %session.identity, "session negotiated");
        Ok(WireSession {
            identity: session.identity,
            device_session_id: session.device_session_id,
            session_token: session.session_token,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BootstrapGrant {
    token: String,
    identity: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    identity: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bootstrap_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_session_id: Option<&'a str>,
    locale: &'a str,
    device: &'a DeviceIdentity,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    identity: String,
    device_session_id: String,
    session_token: String,
}
