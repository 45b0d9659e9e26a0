//! One-shot `issue` and `verify` commands

use anyhow::Context;

use crate::infrastructure::logging::init_logging;
use crate::infrastructure::token::TokenService;

/// Print a freshly signed token for `subject`
pub async fn issue(subject: &str) -> anyhow::Result<()> {
    let service = build_service().await?;

    let issued = service
        .issue(subject)
        .await
        .context("Failed to issue token")?;

    println!("{}", issued.token);
    Ok(())
}

/// Print the verified claims, or fail with the rejection reason
pub async fn verify(token: &str) -> anyhow::Result<()> {
    let service = build_service().await?;

    let claims = service
        .verify(token.trim())
        .await
        .context("Token rejected")?;

    println!("{}", serde_json::to_string_pretty(&claims)?);
    Ok(())
}

async fn build_service() -> anyhow::Result<TokenService> {
    let config = super::load_config()?;
    init_logging(&config.logging);

    crate::create_token_service(&config).await
}
