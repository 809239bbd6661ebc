//! Client identity used to partition admission accounting.

use sha2::{Digest, Sha256};
use std::net::IpAddr;

/// Number of hex characters of the key digest kept in the identity.
const KEY_DIGEST_LEN: usize = 16;

/// A key that uniquely identifies a rate-limited client.
///
/// API keys are stored as a truncated SHA-256 digest, so the registry and
/// the logs never hold a raw credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClientId {
    /// Caller presented an API key (digest of the key)
    ApiKey(String),
    /// Caller is identified by its network address
    Address(IpAddr),
    /// Neither a key nor an address was available
    Unknown,
}

impl ClientId {
    /// Build an identity from a raw API key.
    pub fn from_api_key(key: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        ClientId::ApiKey(digest[..KEY_DIGEST_LEN].to_string())
    }

    /// Derive the identity for a request.
    ///
    /// Prefers the API key, falls back to the peer address, and finally to
    /// a single shared `unknown` bucket.
    pub fn resolve(api_key: Option<&str>, addr: Option<IpAddr>) -> Self {
        match (api_key.filter(|k| !k.is_empty()), addr) {
            (Some(key), _) => Self::from_api_key(key),
            (None, Some(ip)) => ClientId::Address(ip),
            (None, None) => ClientId::Unknown,
        }
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientId::ApiKey(digest) => write!(f, "apikey_{}", digest),
            ClientId::Address(ip) => write!(f, "ip_{}", ip),
            ClientId::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_preferred_over_address() {
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        let id = ClientId::resolve(Some("secret"), Some(ip));
        assert!(matches!(id, ClientId::ApiKey(_)));
    }

    #[test]
    fn test_address_fallback() {
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        assert_eq!(ClientId::resolve(None, Some(ip)), ClientId::Address(ip));
        assert_eq!(ClientId::resolve(Some(""), Some(ip)), ClientId::Address(ip));
        assert_eq!(ClientId::Address(ip).to_string(), "ip_10.0.0.1");
    }

    #[test]
    fn test_unknown_fallback() {
        let id = ClientId::resolve(None, None);
        assert_eq!(id, ClientId::Unknown);
        assert_eq!(id.to_string(), "unknown");
    }

    #[test]
    fn test_api_key_is_hashed_and_stable() {
        let a = ClientId::from_api_key("secret");
        let b = ClientId::from_api_key("secret");
        let c = ClientId::from_api_key("other");

        assert_eq!(a, b);
        assert_ne!(a, c);

        let rendered = a.to_string();
        assert!(rendered.starts_with("apikey_"));
        assert!(!rendered.contains("secret"));
        assert_eq!(rendered.len(), "apikey_".len() + KEY_DIGEST_LEN);
    }
}
