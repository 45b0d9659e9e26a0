use async_trait::async_trait;
use thiserror::Error;

use super::{KeyReference, SigningAlgorithm};

#[cfg(test)]
use mockall::automock;

/// Failure talking to the signing oracle
///
/// An invalid signature is not an error: `verify` reports it as `Ok(false)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Backend unreachable, timed out, or failed internally
    #[error("Signing oracle unavailable: {message}")]
    Unavailable { message: String },

    /// Request refused for structural reasons (unknown or disabled key, wrong key usage)
    #[error("Signing oracle rejected request: {message}")]
    Rejected { message: String },
}

impl OracleError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// External asymmetric signer (KMS, HSM, local key)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SigningOracle: Send + Sync {
    /// Sign the raw message bytes with the referenced key
    async fn sign(
        &self,
        key: &KeyReference,
        message: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<Vec<u8>, OracleError>;

    /// Check a signature; `Ok(false)` when the signature does not match
    async fn verify(
        &self,
        key: &KeyReference,
        message: &[u8],
        signature: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<bool, OracleError>;

    /// Backend name for logging and readiness reporting
    fn backend_name(&self) -> &'static str;
}
