/// In-memory capability representing an authenticated session.
///
/// Cheap to clone; consumers attach it to further protocol requests.
/// Replaced atomically by the authenticator (build-then-swap), never
/// partially updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    /// Identity the service bound the session to (possibly corrected).
    pub identity: String,
    pub device_session_id: String,
    pub session_token: String,
    pub locale: String,
}
