//! Signing oracle contract
//!
//! The oracle holds the private key material; this crate only ever sees key
//! references and opaque signatures.

mod algorithm;
mod key;
mod oracle;

pub use algorithm::SigningAlgorithm;
pub use key::KeyReference;
pub use oracle::{OracleError, SigningOracle};

#[cfg(test)]
pub use oracle::MockSigningOracle;
