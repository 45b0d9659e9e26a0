//! Token endpoints
//!
//! `POST /login` issues a token for a user name, `POST /test_token` and
//! `GET /me` verify one.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tracing::instrument;

use crate::api::middleware::RequireClaims;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, AuthorizationResponse, Json, LoginRequest, LoginResponse, TestTokenRequest,
    WelcomeResponse,
};
use crate::domain::VerifiedClaims;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/login", post(login))
        .route("/test_token", post(test_token))
        .route("/me", get(me))
}

/// GET /
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse::default())
}

/// POST /login
///
/// No credential check is performed; any non-empty user name gets a token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let issued = state.token_service.issue(&request.user_name).await?;

    Ok(Json(LoginResponse {
        jwt_token: issued.token,
    }))
}

/// POST /test_token
#[instrument(skip_all)]
pub async fn test_token(
    State(state): State<AppState>,
    Json(request): Json<TestTokenRequest>,
) -> Result<Json<AuthorizationResponse>, ApiError> {
    let claims = state.token_service.verify(&request.auth_token).await?;

    Ok(Json(AuthorizationResponse {
        my_authorization: claims,
    }))
}

/// GET /me
pub async fn me(RequireClaims(claims): RequireClaims) -> Json<VerifiedClaims> {
    Json(claims)
}
