//! Domain layer - token model, signing contract and error taxonomy

pub mod error;
pub mod signing;
pub mod token;

pub use error::TokenError;
pub use signing::{KeyReference, OracleError, SigningAlgorithm, SigningOracle};
pub use token::{
    Claims, ClaimsPolicy, Header, SigningInput, TokenParts, UnverifiedClaims, VerifiedClaims,
};
