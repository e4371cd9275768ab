use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::builder::SessionBuilder;
use super::bundle::{resolve_locale, CredentialBundle};
use super::error::{AuthError, BuildError};
use super::handle::SessionHandle;
use super::sources::TokenSourcePool;
use crate::client::StoreClient;
use crate::device::{select_device_identity, SpoofProfile};
use crate::store::{keys, CredentialStore};

/// Fixed attempt budget per authentication sequence.
const RETRIES: u32 = 5;

/// How a successful sequence updates the app-provided flag and the
/// recorded bootstrap source.
#[derive(Debug, Clone, Copy)]
enum PersistPolicy {
    /// Leave the flag as stored (silent resume from persisted state).
    KeepFlag,
    /// The user typed these credentials; drop the app-provided flag.
    UserProvided,
    /// The account came from the app; set the flag and remember the
    /// bootstrap source that worked.
    AppProvided,
}

/// Orchestrates the retry loop around [`SessionBuilder`] and owns the
/// cached session handle.
///
/// One authentication sequence runs at a time per value: the whole
/// check-cache-else-build path holds an async lock, so concurrent callers
/// serialize instead of racing on the persisted session token. A cached
/// handle is returned unchanged with no network activity.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use kiosk::client::HttpStoreClient;
/// use kiosk::session::SessionAuthenticator;
/// use kiosk::store::FileCredentialStore;
///
/// # async fn example() -> Result<(), kiosk::session::AuthError> {
/// let store = Arc::new(FileCredentialStore::open_default()?);
/// let client = Arc::new(HttpStoreClient::new());
/// let auth = SessionAuthenticator::new(store, client);
/// let session = auth.get_or_create_session().await?;
/// println!("logged in as {}", session.identity);
/// # Ok(())
/// # }
/// ```
pub struct SessionAuthenticator {
    store: Arc<dyn CredentialStore>,
    builder: SessionBuilder,
    spoof: Option<SpoofProfile>,
    inner: Mutex<Inner>,
}

struct Inner {
    cached: Option<SessionHandle>,
    sources: TokenSourcePool,
}

impl SessionAuthenticator {
    pub fn new(store: Arc<dyn CredentialStore>, client: Arc<dyn StoreClient>) -> Self {
        Self {
            store,
            builder: SessionBuilder::new(client),
            spoof: None,
            inner: Mutex::new(Inner {
                cached: None,
                sources: TokenSourcePool::new(),
            }),
        }
    }

    /// Replace the built-in bootstrap source rotation.
    pub fn with_sources(mut self, sources: TokenSourcePool) -> Self {
        self.inner.get_mut().sources = sources;
        self
    }

    /// Present a spoofed device identity instead of the native one.
    pub fn with_spoof_profile(mut self, profile: SpoofProfile) -> Self {
        self.spoof = Some(profile);
        self
    }

    /// Return the cached session, or rebuild one from persisted state.
    ///
    /// Fails with [`AuthError::CredentialsEmpty`] when no identity is
    /// stored; nothing is sent over the network in that case.
    pub async fn get_or_create_session(&self) -> Result<SessionHandle, AuthError> {
        let mut inner = self.inner.lock().await;
        if let Some(handle) = &inner.cached {
            return Ok(handle.clone());
        }
        let bundle = self.stored_bundle();
        if bundle.identity.is_none() {
            return Err(AuthError::CredentialsEmpty);
        }
        self.run_sequence(&mut inner, bundle, PersistPolicy::KeepFlag)
            .await
    }

    /// Authenticate with explicit credentials, ignoring any stored
    /// session token, and record the identity as user-typed.
    pub async fn login(&self, identity: &str, secret: &str) -> Result<(), AuthError> {
        let mut inner = self.inner.lock().await;
        let bundle = CredentialBundle::interactive(identity, secret, self.locale());
        self.run_sequence(&mut inner, bundle, PersistPolicy::UserProvided)
            .await?;
        Ok(())
    }

    /// Rebuild a session from persisted state (or let the token source
    /// supply an account), marking the identity as app-provided.
    ///
    /// Unlike [`get_or_create_session`](Self::get_or_create_session) this
    /// always rebuilds, so relogin flows get a fresh session.
    pub async fn login_silent(&self) -> Result<(), AuthError> {
        let mut inner = self.inner.lock().await;
        let mut bundle = self.stored_bundle();
        bundle.auto_supplied_identity = true;
        self.run_sequence(&mut inner, bundle, PersistPolicy::AppProvided)
            .await?;
        Ok(())
    }

    /// Drop the stored session token and negotiate a new one, keeping the
    /// stored identity and the last bootstrap source.
    pub async fn refresh_token(&self) -> Result<(), AuthError> {
        let mut inner = self.inner.lock().await;
        self.store.remove(keys::SESSION_TOKEN)?;
        let mut bundle = self.stored_bundle();
        if bundle.identity.is_none() {
            return Err(AuthError::CredentialsEmpty);
        }
        bundle.bootstrap_source_url = self.store.get(keys::LAST_BOOTSTRAP_SOURCE);
        self.run_sequence(&mut inner, bundle, PersistPolicy::AppProvided)
            .await?;
        Ok(())
    }

    /// Clear every persisted field and the cached handle.
    ///
    /// Idempotent and infallible; storage hiccups are logged, not
    /// surfaced.
    pub async fn logout(&self) {
        let mut inner = self.inner.lock().await;
        inner.cached = None;
        for key in keys::ALL {
            if let Err(err) = self.store.remove(key) {
                warn!(key, error = %err, "failed to remove persisted field");
            }
        }
    }

    async fn run_sequence(
        &self,
        inner: &mut Inner,
        mut bundle: CredentialBundle,
        policy: PersistPolicy,
    ) -> Result<SessionHandle, AuthError> {
        let device = select_device_identity(self.spoof.as_ref(), &bundle.locale);
        inner.sources.reset();
        let mut attempt: u32 = 0;
        loop {
            match self
                .builder
                .build(&mut bundle, &device, &mut inner.sources)
                .await
            {
                Ok(handle) => {
                    self.persist(&bundle, &handle, policy)?;
                    inner.cached = Some(handle.clone());
                    info!(identity = %handle.identity, "session established");
                    return Ok(handle);
                }
                // Infrastructure-level; rotating token sources cannot fix
                // it, and retrying would only mask the condition.
                Err(BuildError::Network(message)) => return Err(AuthError::Network(message)),
                Err(BuildError::Misconfigured(message)) => {
                    return Err(AuthError::Internal(message))
                }
                Err(cause) => {
                    bundle.bootstrap_source_url = None;
                    if bundle.auto_supplied_identity {
                        // The service re-derives app-provided accounts, so
                        // the stale identity goes, and the device session
                        // registered under it with it.
                        bundle.identity = None;
                        bundle.device_session_id = None;
                        if let Err(err) = self.store.remove(keys::DEVICE_SESSION_ID) {
                            warn!(error = %err, "failed to drop stale device session id");
                        }
                    }
                    attempt += 1;
                    if attempt >= RETRIES {
                        return Err(AuthError::Exhausted {
                            attempts: attempt,
                            last: cause,
                        });
                    }
                    info!(attempt, cause = %cause, "login retry");
                }
            }
        }
    }

    fn persist(
        &self,
        bundle: &CredentialBundle,
        handle: &SessionHandle,
        policy: PersistPolicy,
    ) -> Result<(), AuthError> {
        self.store.put(keys::IDENTITY, &handle.identity)?;
        self.store.put(keys::DEVICE_SESSION_ID, &handle.device_session_id)?;
        self.store.put(keys::SESSION_TOKEN, &handle.session_token)?;
        match policy {
            PersistPolicy::KeepFlag => {}
            PersistPolicy::UserProvided => {
                self.store.remove(keys::APP_PROVIDED_IDENTITY)?;
            }
            PersistPolicy::AppProvided => {
                self.store.put_bool(keys::APP_PROVIDED_IDENTITY, true)?;
                if let Some(source) = &bundle.bootstrap_source_url {
                    self.store.put(keys::LAST_BOOTSTRAP_SOURCE, source)?;
                }
            }
        }
        Ok(())
    }

    fn stored_bundle(&self) -> CredentialBundle {
        CredentialBundle {
            identity: self.store.get(keys::IDENTITY),
            secret: None,
            device_session_id: self.store.get(keys::DEVICE_SESSION_ID),
            session_token: self.store.get(keys::SESSION_TOKEN),
            bootstrap_source_url: None,
            locale: self.locale(),
            auto_supplied_identity: self.store.get_bool(keys::APP_PROVIDED_IDENTITY),
        }
    }

    fn locale(&self) -> String {
        resolve_locale(
            self.store.get(keys::REQUESTED_LOCALE).as_deref(),
            std::env::var("LANG").ok().as_deref(),
        )
    }
}
