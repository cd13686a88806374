//! UCloud Authentication
//!
//! Handles API key credentials and request signing. Every request carries the
//! public key and a signature derived from the sorted request fields and the
//! private key.

use serde::Serialize;
use sha1::{Digest, Sha1};

/// UCloud API key pair
#[derive(Clone, Default)]
pub struct Credentials {
    pub public_key: String,
    pub private_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Security: never print the private key
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(public_key: &str, private_key: &str) -> Self {
        Self {
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
        }
    }

    /// Sign a set of flattened request fields.
    ///
    /// Fields are sorted by key, each key and value concatenated, the private
    /// key appended, and the SHA-1 digest of the result hex encoded.
    pub fn sign(&self, fields: &[(String, String)]) -> String {
        let mut sorted: Vec<&(String, String)> = fields.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher = Sha1::new();
        for (key, value) in sorted {
            hasher.update(key.as_bytes());
            hasher.update(value.as_bytes());
        }
        hasher.update(self.private_key.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Report whether both keys are configured.
    pub fn check(&self) -> HealthReport {
        let mut report = HealthReport::ok();

        if self.public_key.is_empty() {
            report = HealthReport::error("Public Key must be set");
        }
        // Checked last so it takes precedence when both are missing
        if self.private_key.is_empty() {
            report = HealthReport::error("Private Key must be set");
        }

        report
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Result of a credential health check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthReport {
    fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
            message: "Data source is working".to_string(),
        }
    }

    fn error(message: &str) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sign_is_order_independent() {
        let creds = Credentials::new("pub", "secret");
        let a = creds.sign(&fields(&[("Action", "GetRegion"), ("PublicKey", "pub")]));
        let b = creds.sign(&fields(&[("PublicKey", "pub"), ("Action", "GetRegion")]));
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
    }

    #[test]
    fn test_sign_matches_sha1_of_concatenation() {
        let creds = Credentials::new("pub", "secret");
        let signature = creds.sign(&fields(&[("B", "2"), ("A", "1")]));

        let mut hasher = Sha1::new();
        hasher.update(b"A1B2secret");
        assert_eq!(signature, hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_check_reports_missing_keys() {
        assert_eq!(Credentials::new("pub", "priv").check().status, HealthStatus::Ok);

        let report = Credentials::new("", "priv").check();
        assert_eq!(report.status, HealthStatus::Error);
        assert_eq!(report.message, "Public Key must be set");

        let report = Credentials::new("", "").check();
        assert_eq!(report.message, "Private Key must be set");
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let output = format!("{:?}", Credentials::new("pub", "very-secret"));
        assert!(!output.contains("very-secret"));
    }
}
