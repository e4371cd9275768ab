#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use kiosk::client::{ProtocolError, StoreClient, WireSession};
use kiosk::device::DeviceIdentity;
use kiosk::session::{AuthError, CredentialBundle};
use kiosk::store::CredentialStore;

#[derive(Default)]
pub struct InMemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .remove(key);
        Ok(())
    }
}

/// One scripted outcome for a [`ScriptedStoreClient`] call.
pub enum Step {
    Succeed(WireSession),
    RejectStatus(u16),
    TokenSourceFail,
    NetworkFail,
}

/// Transport double that replays a fixed script and records every bundle
/// it was handed, so tests can assert on attempt counts and the mutations
/// the retry loop applies between attempts.
pub struct ScriptedStoreClient {
    script: Mutex<Vec<Step>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<CredentialBundle>>,
}

impl ScriptedStoreClient {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<CredentialBundle> {
        self.seen.lock().expect("seen lock poisoned").clone()
    }
}

#[async_trait]
impl StoreClient for ScriptedStoreClient {
    async fn authenticate(
        &self,
        bundle: &CredentialBundle,
        _device: &DeviceIdentity,
    ) -> Result<WireSession, ProtocolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock poisoned")
            .push(bundle.clone());
        let step = {
            let mut script = self.script.lock().expect("script lock poisoned");
            if script.is_empty() {
                panic!("scripted client called more times than scripted");
            }
            script.remove(0)
        };
        match step {
            Step::Succeed(session) => Ok(session),
            Step::RejectStatus(status) => Err(ProtocolError::Status {
                status,
                message: "scripted rejection".to_string(),
            }),
            Step::TokenSourceFail => Err(ProtocolError::TokenSource {
                source: bundle
                    .bootstrap_source_url
                    .clone()
                    .unwrap_or_default(),
                message: "scripted token source failure".to_string(),
                cause: None,
            }),
            Step::NetworkFail => Err(ProtocolError::Transport(refused_connection().await)),
        }
    }
}

/// A genuine transport-level failure: nothing listens on port 1.
pub async fn refused_connection() -> reqwest::Error {
    reqwest::Client::new()
        .get("http://127.0.0.1:1/")
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await
        .expect_err("connect to a closed port must fail")
}

pub fn wire_session(identity: &str) -> WireSession {
    WireSession {
        identity: identity.to_string(),
        device_session_id: "dsid-1".to_string(),
        session_token: "token-1".to_string(),
    }
}
