/// Credentials assembled for one authentication sequence.
///
/// Mutable and single-owner: the retry loop clears fields between attempts
/// and the builder writes negotiated values back on success. Nothing here
/// is persisted until a build fully succeeds.
#[derive(Debug, Clone, Default)]
pub struct CredentialBundle {
    /// User identity. Cleared mid-retry when it was app-provided, so the
    /// token source can re-derive the account.
    pub identity: Option<String>,
    /// Present only for interactive logins.
    pub secret: Option<String>,
    /// Opaque device/session identifier negotiated by the service.
    pub device_session_id: Option<String>,
    /// Opaque long-lived token; absent until the first successful build.
    pub session_token: Option<String>,
    /// Token source for the current attempt; `None` forces a fresh draw.
    pub bootstrap_source_url: Option<String>,
    /// Always present; resolved before the sequence starts.
    pub locale: String,
    /// Whether the identity came from the app rather than the user.
    pub auto_supplied_identity: bool,
}

impl CredentialBundle {
    /// Bundle for an interactive login. Stored session tokens are ignored.
    pub fn interactive(identity: impl Into<String>, secret: impl Into<String>, locale: String) -> Self {
        Self {
            identity: Some(identity.into()),
            secret: Some(secret.into()),
            locale,
            ..Self::default()
        }
    }

    /// Whether there is anything at all to authenticate with.
    ///
    /// An app-provided bundle may be empty: the bootstrap source supplies
    /// the account in that flow. Everything else needs at least one of the
    /// four credential fields populated.
    pub fn has_material(&self) -> bool {
        self.auto_supplied_identity
            || self.identity.is_some()
            || self.secret.is_some()
            || self.session_token.is_some()
            || self.device_session_id.is_some()
    }
}

/// Resolve the locale for a sequence: stored preference, else the process
/// environment (`LANG`-style), else `en-US`.
pub(crate) fn resolve_locale(stored: Option<&str>, env_lang: Option<&str>) -> String {
    if let Some(stored) = stored {
        if !stored.is_empty() {
            return stored.to_string();
        }
    }
    if let Some(lang) = env_lang {
        let tag = lang.split('.').next().unwrap_or_default().replace('_', "-");
        if !tag.is_empty() && tag != "C" && tag != "POSIX" {
            return tag;
        }
    }
    "en-US".to_string()
}
