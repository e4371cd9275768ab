//! Durable credential storage.

pub mod file;

pub use file::{FileCredentialStore, StoreConfig};

use crate::session::AuthError;

/// Persisted key names. Renaming any of these invalidates existing state,
/// so they are frozen here rather than spread over call sites.
pub mod keys {
    pub const IDENTITY: &str = "identity";
    pub const APP_PROVIDED_IDENTITY: &str = "app_provided_identity";
    pub const DEVICE_SESSION_ID: &str = "device_session_id";
    pub const SESSION_TOKEN: &str = "session_token";
    pub const LAST_BOOTSTRAP_SOURCE: &str = "last_bootstrap_source";
    pub const REQUESTED_LOCALE: &str = "requested_locale";

    /// Every key removed by a logout.
    pub const ALL: &[&str] = &[
        IDENTITY,
        APP_PROVIDED_IDENTITY,
        DEVICE_SESSION_ID,
        SESSION_TOKEN,
        LAST_BOOTSTRAP_SOURCE,
        REQUESTED_LOCALE,
    ];
}

/// Storage abstraction for persisted session state.
///
/// Calls are synchronous and durable on return. No atomicity is assumed
/// across keys written in sequence; callers order their writes so that a
/// crash between two puts never produces an unusable combination.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str) -> Result<(), AuthError>;
    fn remove(&self, key: &str) -> Result<(), AuthError>;

    fn get_bool(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<(), AuthError> {
        self.put(key, if value { "true" } else { "false" })
    }
}
