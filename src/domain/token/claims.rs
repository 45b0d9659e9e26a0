//! Claims and their trust levels
//!
//! Claims decoded from a presented token start out as [`UnverifiedClaims`].
//! They become [`VerifiedClaims`] only by exchanging a [`SignatureVerified`]
//! proof, which nothing outside this crate can construct.

use serde::{Deserialize, Serialize};

use super::encoder::{decode_segment, signing_input, SigningInput};
use super::Header;
use crate::domain::TokenError;

/// Registered claims carried by every token
///
/// Field order is part of the wire format: `sub`, `iat`, `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity
    sub: String,
    /// Issued at (Unix epoch seconds)
    iat: i64,
    /// Expiration (Unix epoch seconds)
    exp: i64,
}

impl Claims {
    pub fn new(subject: impl Into<String>, issued_at: i64, expires_at: i64) -> Self {
        Self {
            sub: subject.into(),
            iat: issued_at,
            exp: expires_at,
        }
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    pub fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Proof that the oracle accepted a token's signature
#[derive(Debug)]
pub struct SignatureVerified {
    _private: (),
}

impl SignatureVerified {
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

/// Claims read from a token whose signature has not been checked yet
///
/// Deliberately exposes no accessors: nothing may be decided from them.
#[derive(Debug)]
pub struct UnverifiedClaims(Claims);

impl UnverifiedClaims {
    /// Decode a claims segment without trusting it
    pub fn decode(segment: &str) -> Result<Self, TokenError> {
        decode_segment::<Claims>(segment).map(Self)
    }

    /// Re-derive the canonical signing input these claims would have been signed over
    pub fn canonical_signing_input(&self, header: &Header) -> Result<SigningInput, TokenError> {
        signing_input(header, &self.0)
    }

    pub fn into_verified(self, _proof: SignatureVerified) -> VerifiedClaims {
        VerifiedClaims(self.0)
    }
}

/// Claims from a token whose signature the oracle accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VerifiedClaims(Claims);

impl VerifiedClaims {
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    pub fn subject(&self) -> &str {
        self.0.subject()
    }

    pub fn into_inner(self) -> Claims {
        self.0
    }
}
