//! Token issuance and verification service

mod service;

pub use service::{IssuedToken, TokenService};
