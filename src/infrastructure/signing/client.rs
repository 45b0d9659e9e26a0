//! Signing and verification clients
//!
//! Thin wrappers that translate oracle outcomes into the token error
//! taxonomy and record call metrics.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::domain::token::SigningInput;
use crate::domain::{KeyReference, OracleError, SigningAlgorithm, SigningOracle, TokenError};
use crate::infrastructure::observability::record_oracle_call;

fn outcome<T>(result: &Result<T, OracleError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(OracleError::Unavailable { .. }) => "unavailable",
        Err(OracleError::Rejected { .. }) => "rejected",
    }
}

/// Produces signatures through the oracle
#[derive(Clone)]
pub struct SigningClient {
    oracle: Arc<dyn SigningOracle>,
    algorithm: SigningAlgorithm,
}

impl std::fmt::Debug for SigningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningClient")
            .field("backend", &self.oracle.backend_name())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl SigningClient {
    pub fn new(oracle: Arc<dyn SigningOracle>, algorithm: SigningAlgorithm) -> Self {
        Self { oracle, algorithm }
    }

    /// Sign `input` with the referenced key; the signature is returned unchanged
    pub async fn sign(&self, input: &SigningInput, key: &KeyReference) -> Result<Vec<u8>, TokenError> {
        let start = Instant::now();
        let result = self.oracle.sign(key, input.as_bytes(), self.algorithm).await;

        record_oracle_call(
            self.oracle.backend_name(),
            "sign",
            outcome(&result),
            start.elapsed(),
        );

        match result {
            Ok(signature) => {
                debug!(key = %key, signature_len = signature.len(), "Signing input signed");
                Ok(signature)
            }
            Err(OracleError::Unavailable { message }) => {
                error!(key = %key, error = %message, "Signing oracle unavailable");
                Err(TokenError::signing_unavailable(message))
            }
            Err(OracleError::Rejected { message }) => {
                error!(key = %key, error = %message, "Signing oracle rejected request");
                Err(TokenError::signing_rejected(message))
            }
        }
    }
}

/// Checks signatures through the oracle
#[derive(Clone)]
pub struct VerificationClient {
    oracle: Arc<dyn SigningOracle>,
    algorithm: SigningAlgorithm,
}

impl std::fmt::Debug for VerificationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationClient")
            .field("backend", &self.oracle.backend_name())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl VerificationClient {
    pub fn new(oracle: Arc<dyn SigningOracle>, algorithm: SigningAlgorithm) -> Self {
        Self { oracle, algorithm }
    }

    /// `Ok(false)` for a signature the oracle does not accept
    ///
    /// Any failure to obtain a verdict is `VerificationUnavailable`, never `false`.
    pub async fn verify(
        &self,
        input: &SigningInput,
        signature: &[u8],
        key: &KeyReference,
    ) -> Result<bool, TokenError> {
        let start = Instant::now();
        let result = self
            .oracle
            .verify(key, input.as_bytes(), signature, self.algorithm)
            .await;

        let label = match &result {
            Ok(false) => "invalid",
            other => outcome(other),
        };
        record_oracle_call(self.oracle.backend_name(), "verify", label, start.elapsed());

        result.map_err(|e| {
            error!(key = %key, error = %e, "Could not verify signature");
            TokenError::verification_unavailable(e.to_string())
        })
    }
}
