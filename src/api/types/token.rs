use serde::{Deserialize, Serialize};

use crate::domain::VerifiedClaims;

pub const WELCOME_MESSAGE: &str = "Hello welcome JWT Stateless Token App!!!";

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE,
        }
    }
}

/// Unknown fields (e.g. `password`) are accepted and ignored
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_name: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub jwt_token: String,
}

#[derive(Debug, Deserialize)]
pub struct TestTokenRequest {
    pub auth_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthorizationResponse {
    pub my_authorization: VerifiedClaims,
}
