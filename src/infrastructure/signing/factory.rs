//! Signing oracle factory

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{KmsSigningOracle, LocalRsaOracle, RetryingOracle};
use crate::config::{SigningBackend, SigningConfig};
use crate::domain::{KeyReference, SigningOracle, TokenError};

/// Build the configured oracle wrapped with deadlines and bounded retry
pub async fn create_signing_oracle(
    config: &SigningConfig,
) -> Result<Arc<dyn SigningOracle>, TokenError> {
    let key = KeyReference::new(&config.key_id)?;
    let attempt_timeout = Duration::from_millis(config.timeout_ms);

    let backend: Arc<dyn SigningOracle> = match config.backend {
        SigningBackend::Kms => Arc::new(
            KmsSigningOracle::from_env(config.region.as_deref(), attempt_timeout).await,
        ),
        SigningBackend::Local => {
            let path = config.local_key_path.as_deref().ok_or_else(|| {
                TokenError::configuration("signing.local_key_path is required for the local backend")
            })?;

            let pem = tokio::fs::read_to_string(path).await.map_err(|e| {
                TokenError::configuration(format!("Failed to read key file '{}': {}", path, e))
            })?;

            Arc::new(LocalRsaOracle::from_pem(key.clone(), &pem)?)
        }
    };

    info!(
        backend = backend.backend_name(),
        key_id = %key,
        max_attempts = config.retry.max_attempts(),
        timeout_ms = config.timeout_ms,
        "Signing oracle configured"
    );

    Ok(Arc::new(RetryingOracle::new(
        backend,
        config.retry.clone(),
        attempt_timeout,
    )))
}
