//! Bearer token authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::VerifiedClaims;

/// Extractor that requires a verified token in `Authorization: Bearer <jwt>`
#[derive(Debug, Clone)]
pub struct RequireClaims(pub VerifiedClaims);

impl FromRequestParts<AppState> for RequireClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!("Validating bearer token");

        let claims = state.token_service.verify(token).await?;
        Ok(RequireClaims(claims))
    }
}

/// Missing or non-bearer credentials are reported like any other bad token
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(ApiError::invalid_token)
}
