//! Network identifier to verification endpoint mapping.

use crate::error::VerifyError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

static BUILTIN: Lazy<BTreeMap<String, Url>> = Lazy::new(|| {
    [
        ("mainnet", "https://api.etherscan.io/api"),
        ("sepolia", "https://api-sepolia.etherscan.io/api"),
        ("holesky", "https://api-holesky.etherscan.io/api"),
        ("polygon", "https://api.polygonscan.com/api"),
        ("bsc", "https://api.bscscan.com/api"),
        ("arbitrum", "https://api.arbiscan.io/api"),
        ("optimism", "https://api-optimistic.etherscan.io/api"),
        ("base", "https://api.basescan.org/api"),
    ]
    .into_iter()
    .map(|(network, endpoint)| {
        (network.to_string(), Url::parse(endpoint).expect("static endpoint url"))
    })
    .collect()
});

/// Read-only mapping from network identifier to the verification service
/// endpoint. Safe for concurrent reads; verification runs never mutate it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Networks {
    endpoints: BTreeMap<String, Url>,
}

impl Default for Networks {
    fn default() -> Self {
        Self { endpoints: BUILTIN.clone() }
    }
}

impl Networks {
    /// An empty registry, for callers supplying their own table.
    pub fn empty() -> Self {
        Self { endpoints: BTreeMap::new() }
    }

    /// Adds or replaces an endpoint. Trailing slashes are trimmed; they are
    /// known to confuse some explorer frontends.
    pub fn with_endpoint(mut self, network: impl Into<String>, endpoint: Url) -> Self {
        let mut endpoint = endpoint;
        let trimmed = endpoint.path().trim_end_matches('/').to_string();
        endpoint.set_path(&trimmed);
        self.endpoints.insert(network.into(), endpoint);
        self
    }

    /// Resolves the verification endpoint for a network identifier.
    pub fn endpoint(&self, network: &str) -> Result<&Url, VerifyError> {
        self.endpoints
            .get(network)
            .ok_or_else(|| VerifyError::UnsupportedNetwork(network.to_string()))
    }

    /// The known network identifiers, in sorted order.
    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_networks_resolve() {
        let networks = Networks::default();
        let url = networks.endpoint("mainnet").unwrap();
        assert_eq!(url.as_str(), "https://api.etherscan.io/api");
        assert!(networks.networks().any(|n| n == "sepolia"));
    }

    #[test]
    fn unknown_network_is_rejected() {
        let networks = Networks::default();
        let err = networks.endpoint("unknown-chain").unwrap_err();
        assert!(matches!(err, VerifyError::UnsupportedNetwork(n) if n == "unknown-chain"));
    }

    #[test]
    fn custom_endpoint_overrides() {
        let networks = Networks::empty().with_endpoint(
            "devnet",
            Url::parse("https://verifier.example/api/").unwrap(),
        );
        assert_eq!(networks.endpoint("devnet").unwrap().as_str(), "https://verifier.example/api");
    }
}
