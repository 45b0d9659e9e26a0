//! Bounded retry with per-attempt deadline around a signing oracle
//!
//! Only `Unavailable` failures are retried. A rejected request or an
//! invalid-signature verdict is returned immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::domain::{KeyReference, OracleError, SigningAlgorithm, SigningOracle};

/// Retry settings for oracle calls
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay_ms: u64,
    /// Upper bound for any single delay
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 50,
            max_delay_ms: 500,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (0-indexed)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(retry as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }
}

/// Oracle decorator adding deadlines and bounded retries
pub struct RetryingOracle {
    inner: Arc<dyn SigningOracle>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
}

impl std::fmt::Debug for RetryingOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingOracle")
            .field("backend", &self.inner.backend_name())
            .field("policy", &self.policy)
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}

impl RetryingOracle {
    pub fn new(inner: Arc<dyn SigningOracle>, policy: RetryPolicy, attempt_timeout: Duration) -> Self {
        Self {
            inner,
            policy,
            attempt_timeout,
        }
    }

    async fn run<T, F, Fut>(&self, operation: &'static str, mut call: F) -> Result<T, OracleError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, OracleError>>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = self.policy.delay_for_retry(attempt - 1);
                debug!(operation, attempt, delay_ms = delay.as_millis() as u64, "Retrying oracle call");
                tokio::time::sleep(delay).await;
            }

            let result = match timeout(self.attempt_timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(OracleError::unavailable(format!(
                    "{} timed out after {}ms",
                    operation,
                    self.attempt_timeout.as_millis()
                ))),
            };

            match result {
                Err(e) if e.is_retryable() => {
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        max_attempts,
                        backend = self.inner.backend_name(),
                        error = %e,
                        "Oracle call failed"
                    );
                    last_error = Some(e);
                }
                other => return other,
            }
        }

        Err(last_error.unwrap_or_else(|| OracleError::unavailable("No attempts were made")))
    }
}

#[async_trait]
impl SigningOracle for RetryingOracle {
    async fn sign(
        &self,
        key: &KeyReference,
        message: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<Vec<u8>, OracleError> {
        self.run("sign", || self.inner.sign(key, message, algorithm))
            .await
    }

    async fn verify(
        &self,
        key: &KeyReference,
        message: &[u8],
        signature: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<bool, OracleError> {
        self.run("verify", || self.inner.verify(key, message, signature, algorithm))
            .await
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signing::MockSigningOracle;

    fn key() -> KeyReference {
        KeyReference::new("alias/test").unwrap()
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries)
            .with_initial_delay(1)
            .with_max_delay(2)
    }

    fn wrap(mock: MockSigningOracle, max_retries: u32) -> RetryingOracle {
        RetryingOracle::new(
            Arc::new(mock),
            fast_policy(max_retries),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_max_attempts_saturates() {
        assert_eq!(RetryPolicy::new(2).max_attempts(), 3);
        assert_eq!(RetryPolicy::new(u32::MAX).max_attempts(), u32::MAX);
    }

    #[test]
    fn test_delay_calculation() {
        let policy = RetryPolicy::new(5).with_initial_delay(100).with_max_delay(1_000);

        assert_eq!(policy.delay_for_retry(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_retry(4), Duration::from_millis(1_000));
        assert_eq!(policy.max_attempts(), 6);
    }

    #[tokio::test]
    async fn test_retries_unavailable_then_succeeds() {
        let mut mock = MockSigningOracle::new();
        let mut calls = 0;
        mock.expect_sign().times(2).returning(move |_, _, _| {
            calls += 1;
            if calls == 1 {
                Err(OracleError::unavailable("connection reset"))
            } else {
                Ok(vec![1, 2, 3])
            }
        });
        mock.expect_backend_name().return_const("mock");

        let oracle = wrap(mock, 2);
        let signature = oracle
            .sign(&key(), b"input", SigningAlgorithm::default())
            .await
            .unwrap();

        assert_eq!(signature, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_gives_up_after_bounded_attempts() {
        let mut mock = MockSigningOracle::new();
        mock.expect_sign()
            .times(3)
            .returning(|_, _, _| Err(OracleError::unavailable("down")));
        mock.expect_backend_name().return_const("mock");

        let oracle = wrap(mock, 2);
        let result = oracle.sign(&key(), b"input", SigningAlgorithm::default()).await;

        assert!(matches!(result, Err(OracleError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_rejected_is_not_retried() {
        let mut mock = MockSigningOracle::new();
        mock.expect_sign()
            .times(1)
            .returning(|_, _, _| Err(OracleError::rejected("key disabled")));
        mock.expect_backend_name().return_const("mock");

        let oracle = wrap(mock, 3);
        let result = oracle.sign(&key(), b"input", SigningAlgorithm::default()).await;

        assert!(matches!(result, Err(OracleError::Rejected { .. })));
    }

    #[tokio::test]
    async fn test_invalid_signature_is_not_retried() {
        let mut mock = MockSigningOracle::new();
        mock.expect_verify()
            .times(1)
            .returning(|_, _, _, _| Ok(false));
        mock.expect_backend_name().return_const("mock");

        let oracle = wrap(mock, 3);
        let valid = oracle
            .verify(&key(), b"input", b"sig", SigningAlgorithm::default())
            .await
            .unwrap();

        assert!(!valid);
    }

    #[derive(Debug)]
    struct StalledOracle;

    #[async_trait]
    impl SigningOracle for StalledOracle {
        async fn sign(
            &self,
            _key: &KeyReference,
            _message: &[u8],
            _algorithm: SigningAlgorithm,
        ) -> Result<Vec<u8>, OracleError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }

        async fn verify(
            &self,
            _key: &KeyReference,
            _message: &[u8],
            _signature: &[u8],
            _algorithm: SigningAlgorithm,
        ) -> Result<bool, OracleError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(true)
        }

        fn backend_name(&self) -> &'static str {
            "stalled"
        }
    }

    #[tokio::test]
    async fn test_deadline_turns_into_unavailable() {
        let oracle = RetryingOracle::new(
            Arc::new(StalledOracle),
            fast_policy(1),
            Duration::from_millis(10),
        );

        let result = oracle
            .verify(&key(), b"input", b"sig", SigningAlgorithm::default())
            .await;

        match result {
            Err(OracleError::Unavailable { message }) => assert!(message.contains("timed out")),
            other => panic!("expected timeout, got {:?}", other),
        }
    }
}
