//! Token model: header, claims, canonical encoding and compact form

mod claims;
mod compact;
mod encoder;
mod header;
mod policy;

pub use claims::{Claims, SignatureVerified, UnverifiedClaims, VerifiedClaims};
pub use compact::{assemble, parse, TokenParts};
pub use encoder::{decode_segment, encode_segment, signing_input, SigningInput};
pub use header::Header;
pub use policy::{ClaimsPolicy, DEFAULT_VALIDITY_SECS};
