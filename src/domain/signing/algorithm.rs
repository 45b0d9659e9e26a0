use serde::{Deserialize, Serialize};

/// Asymmetric signing scheme used by the oracle
///
/// The service signs with exactly one scheme for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    #[default]
    #[serde(rename = "RS256")]
    RsassaPkcs1V15Sha256,
}

impl SigningAlgorithm {
    /// Name carried in the token header (`alg`)
    pub fn jwt_name(&self) -> &'static str {
        match self {
            Self::RsassaPkcs1V15Sha256 => "RS256",
        }
    }

    /// Name the key-management service uses for this scheme
    pub fn oracle_name(&self) -> &'static str {
        match self {
            Self::RsassaPkcs1V15Sha256 => "RSASSA_PKCS1_V1_5_SHA_256",
        }
    }
}

impl std::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.jwt_name())
    }
}
