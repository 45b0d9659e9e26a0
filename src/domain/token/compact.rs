//! Compact serialization: `header.claims.signature`

use base64::{
    alphabet::URL_SAFE,
    engine::general_purpose::{GeneralPurpose, NO_PAD, URL_SAFE_NO_PAD},
    Engine,
};

use super::SigningInput;
use crate::domain::TokenError;

const SEGMENT_COUNT: usize = 3;

/// Unpadded base64url that tolerates non-zero trailing bits
///
/// A signature whose last character was altered still decodes, so the
/// oracle gets to reject it as invalid.
const SIGNATURE_ENGINE: GeneralPurpose =
    GeneralPurpose::new(&URL_SAFE, NO_PAD.with_decode_allow_trailing_bits(true));

/// Structural pieces of a presented token
///
/// Holds the raw segments exactly as received; none of them is trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    header: String,
    claims: String,
    signature: String,
    signature_bytes: Vec<u8>,
}

impl TokenParts {
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn claims(&self) -> &str {
        &self.claims
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn signature_bytes(&self) -> &[u8] {
        &self.signature_bytes
    }

    /// Whether the signature segment is the unique encoding of its bytes
    ///
    /// False when only the unused trailing bits of the last character differ.
    pub fn signature_is_canonical(&self) -> bool {
        URL_SAFE_NO_PAD.encode(&self.signature_bytes) == self.signature
    }

    /// The bytes the signature covers, as presented
    pub fn signing_input(&self) -> SigningInput {
        SigningInput::from_segments(&self.header, &self.claims)
    }
}

/// Append the encoded signature to a signing input
pub fn assemble(signing_input: &SigningInput, signature: &[u8]) -> String {
    format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
}

/// Split a token into its three segments
///
/// Every segment must be non-empty, unpadded base64url. Header and claims
/// content is not interpreted here.
pub fn parse(token: &str) -> Result<TokenParts, TokenError> {
    let segments: Vec<&str> = token.split('.').collect();

    if segments.len() != SEGMENT_COUNT {
        return Err(TokenError::malformed(format!(
            "Expected {} segments, found {}",
            SEGMENT_COUNT,
            segments.len()
        )));
    }

    if segments.iter().any(|s| s.is_empty()) {
        return Err(TokenError::malformed("Empty token segment"));
    }

    for (name, segment) in ["header", "claims"].iter().zip(&segments) {
        URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
            TokenError::malformed(format!("Invalid base64url in {} segment: {}", name, e))
        })?;
    }

    let signature_bytes = SIGNATURE_ENGINE.decode(segments[2]).map_err(|e| {
        TokenError::malformed(format!("Invalid base64url in signature segment: {}", e))
    })?;

    Ok(TokenParts {
        header: segments[0].to_string(),
        claims: segments[1].to_string(),
        signature: segments[2].to_string(),
        signature_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::{signing_input, Claims, Header};

    fn sample_input() -> SigningInput {
        signing_input(&Header::default(), &Claims::new("alice", 100, 200)).unwrap()
    }

    fn assert_malformed(token: &str) {
        let result = parse(token);
        assert!(
            matches!(result, Err(TokenError::MalformedToken { .. })),
            "expected malformed for {:?}, got {:?}",
            token,
            result
        );
    }

    #[test]
    fn test_assemble_then_parse() {
        let input = sample_input();
        let signature = vec![0xde, 0xad, 0xbe, 0xef, 0x01];

        let token = assemble(&input, &signature);
        let parts = parse(&token).unwrap();

        let (header, claims) = input.as_str().split_once('.').unwrap();
        assert_eq!(parts.header(), header);
        assert_eq!(parts.claims(), claims);
        assert_eq!(parts.signature(), URL_SAFE_NO_PAD.encode(&signature));
        assert_eq!(parts.signature_bytes(), signature.as_slice());
        assert_eq!(parts.signing_input(), input);
    }

    #[test]
    fn test_three_segments() {
        let token = assemble(&sample_input(), b"sig");
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_wrong_segment_counts() {
        let token = assemble(&sample_input(), b"sig");
        let segments: Vec<&str> = token.split('.').collect();

        assert_malformed(segments[0]);
        assert_malformed(&segments[..2].join("."));
        assert_malformed(&format!("{}.{}", token, segments[2]));
        assert_malformed(&format!("{}.a.b", token));
    }

    #[test]
    fn test_empty_segments() {
        assert_malformed("");
        assert_malformed("..");
        assert_malformed("eyJhIjoxfQ..c2ln");
        assert_malformed(".eyJhIjoxfQ.c2ln");
        assert_malformed("eyJhIjoxfQ.eyJhIjoxfQ.");
    }

    #[test]
    fn test_invalid_alphabet() {
        assert_malformed("eyJhIjoxfQ.eyJhIjox*Q.c2ln");
        assert_malformed("eyJh+joxfQ.eyJhIjoxfQ.c2ln");
        assert_malformed("eyJhIjoxfQ.eyJhIjoxfQ.c2l/");
        assert_malformed("eyJhIjoxfQ.eyJhIjoxfQ.c2 n");
    }

    #[test]
    fn test_padding_rejected() {
        assert_malformed("eyJhIjoxfQ.eyJhIjoxfQ.c2lnbg==");
    }

    #[test]
    fn test_signature_trailing_bits_tolerated() {
        // "c2lu" is "sin"; "c2m" carries non-zero trailing bits after "si"
        let parts = parse("eyJhIjoxfQ.eyJhIjoxfQ.c2m").unwrap();
        assert_eq!(parts.signature_bytes(), b"si");
        assert!(!parts.signature_is_canonical());
        assert!(parse("eyJhIjoxfQ.eyJhIjoxfQ.c2k").unwrap().signature_is_canonical());

        assert_malformed("eyJhIjoxfQ.eyJhIjoxfQ.c2m=");
    }

    #[test]
    fn test_parse_does_not_interpret_content() {
        // Valid base64url, not JSON
        let parts = parse("aGVsbG8.d29ybGQ.c2ln").unwrap();
        assert_eq!(parts.header(), "aGVsbG8");
        assert_eq!(parts.signature_bytes(), b"sig");
    }
}
