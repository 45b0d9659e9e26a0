use serde::Deserialize;

use crate::domain::token::DEFAULT_VALIDITY_SECS;
use crate::domain::TokenError;
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::signing::RetryPolicy;

/// Longest token lifetime accepted from configuration (one year)
pub const MAX_VALIDITY_SECS: i64 = 365 * 86_400;

/// Retries beyond this would stall the request path
pub const MAX_ORACLE_RETRIES: u32 = 5;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub signing: SigningConfig,
    #[serde(default)]
    pub token: TokenConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which signing oracle backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SigningBackend {
    /// AWS KMS asymmetric key
    #[default]
    Kms,
    /// RSA private key loaded from a PEM file
    Local,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    pub backend: SigningBackend,
    /// Key reference passed to the oracle (KMS key id, ARN or alias)
    pub key_id: String,
    /// AWS region override; the default provider chain is used otherwise
    pub region: Option<String>,
    /// PEM private key for the local backend
    pub local_key_path: Option<String>,
    /// Deadline for a single oracle attempt
    pub timeout_ms: u64,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Seconds between `iat` and `exp`
    pub validity_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            backend: SigningBackend::default(),
            key_id: "alias/JWTSigningKey".to_string(),
            region: None,
            local_key_path: None,
            timeout_ms: 2_000,
            retry: RetryPolicy::default(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            validity_secs: DEFAULT_VALIDITY_SECS,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.token.validity_secs <= 0 || self.token.validity_secs > MAX_VALIDITY_SECS {
            return Err(TokenError::configuration(format!(
                "token.validity_secs must be between 1 and {}",
                MAX_VALIDITY_SECS
            )));
        }

        if self.signing.retry.max_retries > MAX_ORACLE_RETRIES {
            return Err(TokenError::configuration(format!(
                "signing.retry.max_retries must be at most {}",
                MAX_ORACLE_RETRIES
            )));
        }

        if self.signing.key_id.trim().is_empty() {
            return Err(TokenError::configuration("signing.key_id cannot be empty"));
        }

        if self.signing.timeout_ms == 0 {
            return Err(TokenError::configuration(
                "signing.timeout_ms must be positive",
            ));
        }

        if self.signing.backend == SigningBackend::Local && self.signing.local_key_path.is_none() {
            return Err(TokenError::configuration(
                "signing.local_key_path is required for the local backend",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.signing.backend, SigningBackend::Kms);
        assert_eq!(config.signing.key_id, "alias/JWTSigningKey");
        assert_eq!(config.token.validity_secs, 86_400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization() {
        let config: AppConfig = serde_json::from_str(
            r#"{"signing": {"backend": "local", "local_key_path": "/tmp/key.pem"}, "token": {"validity_secs": 60}}"#,
        )
        .unwrap();

        assert_eq!(config.signing.backend, SigningBackend::Local);
        assert_eq!(config.signing.key_id, "alias/JWTSigningKey");
        assert_eq!(config.signing.timeout_ms, 2_000);
        assert_eq!(config.token.validity_secs, 60);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_backend_requires_key_path() {
        let mut config = AppConfig::default();
        config.signing.backend = SigningBackend::Local;

        assert!(matches!(
            config.validate(),
            Err(TokenError::Configuration { .. })
        ));
    }

    #[test]
    fn test_invalid_validity() {
        let mut config = AppConfig::default();
        config.token.validity_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validity_upper_bound() {
        let mut config = AppConfig::default();

        config.token.validity_secs = MAX_VALIDITY_SECS;
        assert!(config.validate().is_ok());

        config.token.validity_secs = i64::MAX;
        assert!(matches!(
            config.validate(),
            Err(TokenError::Configuration { .. })
        ));
    }

    #[test]
    fn test_retry_upper_bound() {
        let mut config = AppConfig::default();

        config.signing.retry.max_retries = MAX_ORACLE_RETRIES;
        assert!(config.validate().is_ok());

        config.signing.retry.max_retries = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(TokenError::Configuration { .. })
        ));
    }

    #[test]
    fn test_empty_key_id() {
        let mut config = AppConfig::default();
        config.signing.key_id = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
