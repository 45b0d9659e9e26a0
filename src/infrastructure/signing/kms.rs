//! AWS KMS signing oracle

use std::time::Duration;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_kms::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::types::{MessageType, SigningAlgorithmSpec};
use aws_sdk_kms::Client as KmsClient;
use tracing::debug;

use crate::domain::{KeyReference, OracleError, SigningAlgorithm, SigningOracle};

/// Error code KMS returns from `Verify` for a signature that does not match
const INVALID_SIGNATURE_CODE: &str = "KMSInvalidSignatureException";

/// Error codes that mean the request itself is wrong and retrying cannot help
const REJECTION_CODES: &[&str] = &[
    "NotFoundException",
    "DisabledException",
    "InvalidKeyUsageException",
    "KMSInvalidStateException",
    "InvalidGrantTokenException",
    "AccessDeniedException",
    "ValidationException",
];

/// Classify a failed KMS call by its error code
fn oracle_error(code: Option<&str>, detail: String) -> OracleError {
    match code {
        Some(code) if REJECTION_CODES.contains(&code) => OracleError::rejected(detail),
        _ => OracleError::unavailable(detail),
    }
}

fn kms_algorithm(algorithm: SigningAlgorithm) -> SigningAlgorithmSpec {
    match algorithm {
        SigningAlgorithm::RsassaPkcs1V15Sha256 => SigningAlgorithmSpec::RsassaPkcs1V15Sha256,
    }
}

/// Oracle backed by an asymmetric KMS key (`SIGN_VERIFY` usage)
///
/// SDK retries are disabled; bounded retry is applied by `RetryingOracle`.
#[derive(Debug, Clone)]
pub struct KmsSigningOracle {
    client: KmsClient,
}

impl KmsSigningOracle {
    /// Build a client from the default AWS provider chain
    pub async fn from_env(region: Option<&str>, attempt_timeout: Duration) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_attempt_timeout(attempt_timeout)
                    .build(),
            );

        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }

        let config = loader.load().await;
        Self::from_client(KmsClient::new(&config))
    }

    pub fn from_client(client: KmsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SigningOracle for KmsSigningOracle {
    async fn sign(
        &self,
        key: &KeyReference,
        message: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<Vec<u8>, OracleError> {
        let response = self
            .client
            .sign()
            .key_id(key.as_str())
            .message(Blob::new(message.to_vec()))
            .message_type(MessageType::Raw)
            .signing_algorithm(kms_algorithm(algorithm))
            .send()
            .await
            .map_err(|e| {
                oracle_error(
                    e.code(),
                    format!("KMS sign error: {}", DisplayErrorContext(&e)),
                )
            })?;

        let signature = response
            .signature()
            .map(|blob| blob.as_ref().to_vec())
            .ok_or_else(|| OracleError::unavailable("KMS sign response contained no signature"))?;

        debug!(key = %key, "KMS produced signature");
        Ok(signature)
    }

    async fn verify(
        &self,
        key: &KeyReference,
        message: &[u8],
        signature: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<bool, OracleError> {
        let result = self
            .client
            .verify()
            .key_id(key.as_str())
            .message(Blob::new(message.to_vec()))
            .message_type(MessageType::Raw)
            .signature(Blob::new(signature.to_vec()))
            .signing_algorithm(kms_algorithm(algorithm))
            .send()
            .await;

        match result {
            Ok(response) => Ok(response.signature_valid()),
            Err(e) if e.code() == Some(INVALID_SIGNATURE_CODE) => Ok(false),
            Err(e) => Err(oracle_error(
                e.code(),
                format!("KMS verify error: {}", DisplayErrorContext(&e)),
            )),
        }
    }

    fn backend_name(&self) -> &'static str {
        "kms"
    }
}
