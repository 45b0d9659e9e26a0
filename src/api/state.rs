//! Application state shared by handlers

use std::sync::Arc;

use crate::infrastructure::token::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(token_service: TokenService) -> Self {
        Self {
            token_service: Arc::new(token_service),
        }
    }
}
