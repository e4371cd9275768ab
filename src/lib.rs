//! Kiosk — session authentication for application-store services
//!
//! Builds a reusable, revocable session against a remote application-store
//! service: assembles a credential bundle from stored or supplied
//! credentials, retries rejected attempts across a rotating set of
//! bootstrap-token sources, and persists just enough state to resume the
//! session after a restart without re-prompting the user.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use kiosk::client::HttpStoreClient;
//! use kiosk::session::SessionAuthenticator;
//! use kiosk::store::FileCredentialStore;
//!
//! # async fn example() -> Result<(), kiosk::session::AuthError> {
//! let store = Arc::new(FileCredentialStore::open_default()?);
//! let client = Arc::new(HttpStoreClient::new());
//! let auth = SessionAuthenticator::new(store, client);
//!
//! auth.login("user@example.org", "hunter2").await?;
//! let session = auth.get_or_create_session().await?;
//! println!("device session: {}", session.device_session_id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod device;
pub mod session;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
