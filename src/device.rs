//! Device identity presented to the store service at authentication.

use serde::{Deserialize, Serialize};

/// The device fields the store service sees during authentication, either
/// the running client's own or a spoof profile's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub brand: String,
    pub model: String,
    pub product: String,
    pub platform_level: u32,
    pub build_fingerprint: String,
    pub locale: String,
}

/// A spoofed device description, deserialized from a profile file.
///
/// Profiles are property bags maintained outside this crate; only the
/// fields the authentication exchange needs are read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpoofProfile {
    pub brand: String,
    pub model: String,
    pub product: String,
    #[serde(rename = "platformLevel")]
    pub platform_level: u32,
    #[serde(rename = "buildFingerprint")]
    pub build_fingerprint: String,
}

impl DeviceIdentity {
    /// Identity of the running client itself.
    pub fn native(locale: impl Into<String>) -> Self {
        Self {
            brand: "kiosk".to_string(),
            model: "reference-client".to_string(),
            product: "kiosk_client".to_string(),
            platform_level: 33,
            build_fingerprint: format!("kiosk/reference-client:{}", env!("CARGO_PKG_VERSION")),
            locale: locale.into(),
        }
    }
}

/// Choose the device identity for an authentication sequence.
///
/// `None` yields the native identity; a profile substitutes every device
/// field while the locale always comes from the resolved bundle locale.
pub fn select_device_identity(spoof: Option<&SpoofProfile>, locale: &str) -> DeviceIdentity {
    match spoof {
        None => DeviceIdentity::native(locale),
        Some(profile) => DeviceIdentity {
            brand: profile.brand.clone(),
            model: profile.model.clone(),
            product: profile.product.clone(),
            platform_level: profile.platform_level,
            build_fingerprint: profile.build_fingerprint.clone(),
            locale: locale.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SpoofProfile {
        SpoofProfile {
            brand: "acme".to_string(),
            model: "anvil-9".to_string(),
            product: "anvil".to_string(),
            platform_level: 30,
            build_fingerprint: "acme/anvil-9:11".to_string(),
        }
    }

    #[test]
    fn no_profile_selects_native_identity() {
        let identity = select_device_identity(None, "en-US");
        assert_eq!(identity.brand, "kiosk");
        assert_eq!(identity.locale, "en-US");
    }

    #[test]
    fn profile_replaces_device_fields_but_not_locale() {
        let identity = select_device_identity(Some(&profile()), "de-DE");
        assert_eq!(identity.model, "anvil-9");
        assert_eq!(identity.platform_level, 30);
        assert_eq!(identity.locale, "de-DE");
    }

    #[test]
    fn profile_deserializes_from_json_property_bag() {
        let identity: SpoofProfile = serde_json::from_str(
            r#"{
                "brand": "acme",
                "model": "anvil-9",
                "product": "anvil",
                "platformLevel": 30,
                "buildFingerprint": "acme/anvil-9:11"
            }"#,
        )
        .unwrap();
        assert_eq!(identity, profile());
    }
}
