//! Expected topology — the image identity the deployed VM must carry.

use serde::{Deserialize, Serialize};

/// Default expected image publisher.
pub const DEFAULT_PUBLISHER: &str = "Canonical";
/// Default expected image offer.
pub const DEFAULT_OFFER: &str = "0001-com-ubuntu-server-jammy";
/// Default expected image SKU.
pub const DEFAULT_SKU: &str = "22_04-lts-gen2";

/// The base image the deployed VM is expected to run. Injected configuration,
/// compared field by field against the provider-reported image reference.
/// `version` is an explicit opt-in: when unset the version check is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpectedImage {
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Default for ExpectedImage {
    fn default() -> Self {
        Self {
            publisher: DEFAULT_PUBLISHER.to_string(),
            offer: DEFAULT_OFFER.to_string(),
            sku: DEFAULT_SKU.to_string(),
            version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_jammy_without_version() {
        let expected = ExpectedImage::default();
        assert_eq!(expected.publisher, "Canonical");
        assert_eq!(expected.offer, "0001-com-ubuntu-server-jammy");
        assert_eq!(expected.sku, "22_04-lts-gen2");
        assert!(expected.version.is_none());
    }

    #[test]
    fn partial_yaml_fills_remaining_defaults() {
        let expected: ExpectedImage =
            serde_yaml::from_str("publisher: Debian").expect("should parse");
        assert_eq!(expected.publisher, "Debian");
        assert_eq!(expected.offer, DEFAULT_OFFER);
    }
}
