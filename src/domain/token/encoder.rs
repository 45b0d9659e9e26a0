//! Canonical encoding of header and claims into the bytes that get signed
//!
//! JSON is compact with struct field order; every segment is base64url
//! without padding (RFC 7515). Equal inputs always give equal output.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de::DeserializeOwned, Serialize};

use super::{Claims, Header};
use crate::domain::TokenError;

/// `b64url(header) "." b64url(claims)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningInput(String);

impl SigningInput {
    pub(crate) fn from_segments(header: &str, claims: &str) -> Self {
        Self(format!("{}.{}", header, claims))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for SigningInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serialize a value to compact JSON and base64url-encode it
pub fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| TokenError::encoding(format!("Failed to serialize segment: {}", e)))?;

    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Inverse of [`encode_segment`]; any failure is a malformed token
pub fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::malformed(format!("Invalid base64url segment: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::malformed(format!("Invalid segment JSON: {}", e)))
}

/// Build the signing input for a header and claims pair
pub fn signing_input(header: &Header, claims: &Claims) -> Result<SigningInput, TokenError> {
    let header = encode_segment(header)?;
    let claims = encode_segment(claims)?;

    Ok(SigningInput::from_segments(&header, &claims))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims() -> Claims {
        Claims::new("alice", 1_700_000_000, 1_700_086_400)
    }

    #[test]
    fn test_deterministic() {
        let header = Header::default();
        let claims = sample_claims();

        let first = signing_input(&header, &claims).unwrap();
        let second = signing_input(&header.clone(), &claims.clone()).unwrap();

        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn test_known_encoding() {
        let input = signing_input(&Header::default(), &sample_claims()).unwrap();
        let (header, claims) = input.as_str().split_once('.').unwrap();

        // {"alg":"RS256","typ":"JWT"}
        assert_eq!(header, "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9");
        assert_eq!(
            String::from_utf8(URL_SAFE_NO_PAD.decode(claims).unwrap()).unwrap(),
            r#"{"sub":"alice","iat":1700000000,"exp":1700086400}"#
        );
    }

    #[test]
    fn test_no_padding_or_standard_alphabet() {
        // Subjects chosen so the JSON length is not a multiple of three
        for subject in ["a", "ab", "abc", "~~~???>>>"] {
            let claims = Claims::new(subject, 1, 2);
            let input = signing_input(&Header::default(), &claims).unwrap();

            assert!(!input.as_str().contains('='));
            assert!(!input.as_str().contains('+'));
            assert!(!input.as_str().contains('/'));
        }
    }

    #[test]
    fn test_decode_inverse() {
        let claims = sample_claims();
        let segment = encode_segment(&claims).unwrap();

        let decoded: Claims = decode_segment(&segment).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_rejects_padding() {
        let padded = format!("{}=", encode_segment(&Claims::new("a", 1, 2)).unwrap());
        let result: Result<Claims, _> = decode_segment(&padded);
        assert!(matches!(result, Err(TokenError::MalformedToken { .. })));
    }

    #[test]
    fn test_decode_rejects_invalid_alphabet() {
        let result: Result<Claims, _> = decode_segment("eyJzdWIi*");
        assert!(matches!(result, Err(TokenError::MalformedToken { .. })));
    }
}
