//! KMS JWT Service
//!
//! Stateless issuance and verification of RS256 JSON Web Tokens whose
//! signing key never leaves an external signing oracle:
//! - AWS KMS or a local RSA key as the oracle
//! - Canonical, deterministic token encoding
//! - A single uniform rejection for malformed, forged and expired tokens

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use domain::{ClaimsPolicy, KeyReference};
use infrastructure::signing::create_signing_oracle;
use infrastructure::token::TokenService;
use tracing::info;

/// Build the token service from configuration
pub async fn create_token_service(config: &AppConfig) -> anyhow::Result<TokenService> {
    config.validate()?;

    let key = KeyReference::new(&config.signing.key_id)?;
    let oracle = create_signing_oracle(&config.signing).await?;
    let policy = ClaimsPolicy::new(config.token.validity_secs);

    info!(
        backend = oracle.backend_name(),
        key_id = %key,
        validity_secs = policy.validity_secs(),
        "Token service initialized"
    );

    Ok(TokenService::new(oracle, key, policy))
}

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    Ok(AppState::new(create_token_service(config).await?))
}
