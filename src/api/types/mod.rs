//! Request, response and error types for the HTTP surface

pub mod error;
pub mod json;
pub mod token;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType, INVALID_TOKEN_MESSAGE};
pub use json::Json;
pub use token::{
    AuthorizationResponse, LoginRequest, LoginResponse, TestTokenRequest, WelcomeResponse,
};
