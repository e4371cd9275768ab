//! Session authentication: credential bundles, the single-attempt
//! builder, the bootstrap source rotation, and the retry state machine.

pub mod authenticator;
pub mod builder;
pub mod bundle;
pub mod error;
pub mod handle;
pub mod sources;

pub use authenticator::SessionAuthenticator;
pub use builder::SessionBuilder;
pub use bundle::CredentialBundle;
pub use error::{AuthError, BuildError, RejectionReason};
pub use handle::SessionHandle;
pub use sources::TokenSourcePool;
