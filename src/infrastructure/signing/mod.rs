//! Signing oracle backends and the clients that call them

mod client;
mod factory;
mod kms;
mod local;
mod retry;

pub use client::{SigningClient, VerificationClient};
pub use factory::create_signing_oracle;
pub use kms::KmsSigningOracle;
pub use local::LocalRsaOracle;
pub use retry::{RetryPolicy, RetryingOracle};
