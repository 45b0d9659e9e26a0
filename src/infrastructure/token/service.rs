//! Token issuance and verification

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::token::{
    assemble, decode_segment, parse, signing_input, Claims, ClaimsPolicy, Header,
    SignatureVerified, UnverifiedClaims, VerifiedClaims,
};
use crate::domain::{KeyReference, SigningAlgorithm, SigningOracle, TokenError};
use crate::infrastructure::observability::record_token_operation;
use crate::infrastructure::signing::{SigningClient, VerificationClient};

/// A freshly issued token and the claims inside it
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Stateless token service; nothing is retained between calls
#[derive(Debug, Clone)]
pub struct TokenService {
    algorithm: SigningAlgorithm,
    header: Header,
    policy: ClaimsPolicy,
    key: KeyReference,
    backend: &'static str,
    signer: SigningClient,
    verifier: VerificationClient,
}

impl TokenService {
    pub fn new(oracle: Arc<dyn SigningOracle>, key: KeyReference, policy: ClaimsPolicy) -> Self {
        let algorithm = SigningAlgorithm::default();

        Self {
            algorithm,
            header: Header::for_algorithm(algorithm),
            policy,
            key,
            backend: oracle.backend_name(),
            signer: SigningClient::new(oracle.clone(), algorithm),
            verifier: VerificationClient::new(oracle, algorithm),
        }
    }

    pub fn key_reference(&self) -> &KeyReference {
        &self.key
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend
    }

    pub fn validity_secs(&self) -> i64 {
        self.policy.validity_secs()
    }

    /// Issue a token for `subject`, valid from now
    pub async fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Utc::now().timestamp()).await
    }

    pub async fn issue_at(&self, subject: &str, now: i64) -> Result<IssuedToken, TokenError> {
        let result = self.try_issue(subject, now).await;

        match &result {
            Ok(issued) => {
                record_token_operation("issue", "issued");
                info!(
                    subject = %issued.claims.subject(),
                    expires_at = issued.claims.expires_at(),
                    "Token issued"
                );
            }
            Err(e) => {
                record_token_operation("issue", e.kind());
                warn!(error = %e, "Token issuance failed");
            }
        }

        result
    }

    async fn try_issue(&self, subject: &str, now: i64) -> Result<IssuedToken, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::invalid_subject("Subject cannot be empty"));
        }

        let claims = self.policy.issue_at(subject, now);
        let input = signing_input(&self.header, &claims)?;
        let signature = self.signer.sign(&input, &self.key).await?;

        Ok(IssuedToken {
            token: assemble(&input, &signature),
            claims,
        })
    }

    /// Verify a presented token against the current time
    pub async fn verify(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        self.verify_at(token, Utc::now().timestamp()).await
    }

    pub async fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedClaims, TokenError> {
        let result = self.try_verify(token, now).await;

        match &result {
            Ok(claims) => {
                record_token_operation("verify", "accepted");
                info!(subject = %claims.subject(), "Token accepted");
            }
            Err(e) if e.is_rejection() => {
                record_token_operation("verify", e.kind());
                warn!(reason = e.kind(), "Token rejected");
            }
            Err(e) => {
                record_token_operation("verify", e.kind());
                warn!(error = %e, "Token verification failed");
            }
        }

        result
    }

    async fn try_verify(&self, token: &str, now: i64) -> Result<VerifiedClaims, TokenError> {
        let parts = parse(token)?;

        let header: Header = decode_segment(parts.header())?;
        if header != self.header {
            return Err(TokenError::malformed(format!(
                "Unsupported token header: alg={}, typ={}",
                header.alg(),
                header.typ()
            )));
        }

        let unverified = UnverifiedClaims::decode(parts.claims())?;
        let input = unverified.canonical_signing_input(&self.header)?;
        if input != parts.signing_input() {
            return Err(TokenError::malformed("Token is not canonically encoded"));
        }

        if !parts.signature_is_canonical() {
            return Err(TokenError::SignatureInvalid);
        }

        let valid = self
            .verifier
            .verify(&input, parts.signature_bytes(), &self.key)
            .await?;
        if !valid {
            return Err(TokenError::SignatureInvalid);
        }

        let verified = unverified.into_verified(SignatureVerified::new());
        if self.policy.is_expired(verified.claims(), now) {
            return Err(TokenError::expired(verified.claims().expires_at()));
        }

        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signing::mock::HonestOracle;
    use crate::domain::token::encode_segment;
    use crate::domain::OracleError;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    const KEY: &str = "alias/JWTSigningKey";
    const NOW: i64 = 1_700_000_000;

    fn service_with(oracle: HonestOracle) -> (TokenService, Arc<HonestOracle>) {
        let oracle = Arc::new(oracle);
        let service = TokenService::new(
            oracle.clone(),
            KeyReference::new(KEY).unwrap(),
            ClaimsPolicy::default(),
        );
        (service, oracle)
    }

    fn service() -> TokenService {
        service_with(HonestOracle::new(KEY)).0
    }

    /// Swap one base64url character for another that keeps trailing bits zero at any position
    fn alter_char(c: char) -> char {
        if c == 'A' { 'Q' } else { 'A' }
    }

    fn replace_at(segment: &str, index: usize) -> String {
        segment
            .chars()
            .enumerate()
            .map(|(i, c)| if i == index { alter_char(c) } else { c })
            .collect()
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let service = service();

        let issued = service.issue_at("alice", NOW).await.unwrap();
        assert_eq!(issued.token.split('.').count(), 3);
        assert_eq!(issued.claims.expires_at(), NOW + 86_400);

        let claims = service.verify_at(&issued.token, NOW + 60).await.unwrap();
        assert_eq!(claims.subject(), "alice");
        assert_eq!(claims.claims(), &issued.claims);
    }

    #[tokio::test]
    async fn test_issue_with_current_clock() {
        let service = service();

        let issued = service.issue("alice").await.unwrap();
        let claims = service.verify(&issued.token).await.unwrap();

        assert_eq!(claims.subject(), "alice");
    }

    #[tokio::test]
    async fn test_same_claims_give_same_token() {
        let service = service();

        let first = service.issue_at("alice", NOW).await.unwrap();
        let second = service.issue_at("alice", NOW).await.unwrap();

        assert_eq!(first.token, second.token);
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let service = service();
        let issued = service.issue_at("alice", NOW).await.unwrap();
        let expires_at = issued.claims.expires_at();

        assert!(service.verify_at(&issued.token, expires_at).await.is_ok());

        let result = service.verify_at(&issued.token, expires_at + 1).await;
        assert!(matches!(result, Err(TokenError::Expired { expires_at: e }) if e == expires_at));
    }

    #[tokio::test]
    async fn test_expired_but_signed_claims() {
        let service = service();
        let issued = service.issue_at("alice", NOW - 2 * 86_400).await.unwrap();

        let result = service.verify_at(&issued.token, NOW).await;
        assert!(matches!(result, Err(TokenError::Expired { .. })));
    }

    #[tokio::test]
    async fn test_any_altered_last_signature_char() {
        let (service, oracle) = service_with(HonestOracle::new(KEY));
        let issued = service.issue_at("alice", NOW).await.unwrap();

        let (input, signature) = issued.token.rsplit_once('.').unwrap();
        let (head, last) = signature.split_at(signature.len() - 1);
        let alphabet = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

        let mut tried = 0;
        for replacement in alphabet.chars().filter(|c| c.to_string() != last) {
            let token = format!("{}.{}{}", input, head, replacement);
            let result = service.verify_at(&token, NOW).await;

            assert!(
                matches!(result, Err(TokenError::SignatureInvalid)),
                "replacement {:?}: {:?}",
                replacement,
                result
            );
            tried += 1;
        }

        assert_eq!(tried, 63);
        // Changes confined to unused trailing bits never reach the oracle
        assert!(oracle.verify_calls() < 63);
    }

    #[tokio::test]
    async fn test_tampered_claims() {
        let service = service();
        let issued = service.issue_at("alice", NOW).await.unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();

        let forged = Claims::new("mallory", NOW, NOW + 86_400);
        let forged_segment = encode_segment(&forged).unwrap();
        let token = format!("{}.{}.{}", parts[0], forged_segment, parts[2]);

        let result = service.verify_at(&token, NOW).await;
        assert!(matches!(result, Err(TokenError::SignatureInvalid)));
    }

    #[tokio::test]
    async fn test_any_claims_bit_flip_is_rejected() {
        let service = service();
        let issued = service.issue_at("alice", NOW).await.unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();

        for index in 0..parts[1].len() {
            let token = format!("{}.{}.{}", parts[0], replace_at(parts[1], index), parts[2]);
            let result = service.verify_at(&token, NOW).await;

            let err = result.expect_err("tampered token must not verify");
            assert!(err.is_rejection(), "index {}: {:?}", index, err);
        }
    }

    #[tokio::test]
    async fn test_malformed_tokens() {
        let (service, oracle) = service_with(HonestOracle::new(KEY));
        let issued = service.issue_at("alice", NOW).await.unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();

        let candidates = [
            parts[0].to_string(),
            parts[..2].join("."),
            format!("{}.{}", issued.token, parts[2]),
            format!("{}.{}.{}!", parts[0], parts[1], parts[2]),
            format!("{}.{}.{}=", parts[0], parts[1], parts[2]),
            String::new(),
        ];

        for token in candidates {
            let result = service.verify_at(&token, NOW).await;
            assert!(
                matches!(result, Err(TokenError::MalformedToken { .. })),
                "{:?}",
                token
            );
        }

        assert_eq!(oracle.verify_calls(), 0);
    }

    #[tokio::test]
    async fn test_foreign_header_rejected_before_oracle() {
        let (service, oracle) = service_with(HonestOracle::new(KEY));
        let issued = service.issue_at("alice", NOW).await.unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();

        let none_header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let token = format!("{}.{}.{}", none_header, parts[1], parts[2]);

        let result = service.verify_at(&token, NOW).await;
        assert!(matches!(result, Err(TokenError::MalformedToken { .. })));
        assert_eq!(oracle.verify_calls(), 0);
    }

    #[tokio::test]
    async fn test_non_canonical_claims_rejected() {
        let service = service();
        let issued = service.issue_at("alice", NOW).await.unwrap();
        let parts: Vec<&str> = issued.token.split('.').collect();

        let spaced = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"sub": "alice", "iat": {}, "exp": {}}}"#,
            NOW,
            NOW + 86_400
        ));
        let token = format!("{}.{}.{}", parts[0], spaced, parts[2]);

        let result = service.verify_at(&token, NOW).await;
        assert!(matches!(result, Err(TokenError::MalformedToken { .. })));
    }

    #[tokio::test]
    async fn test_empty_subject() {
        let (service, oracle) = service_with(HonestOracle::new(KEY));

        let result = service.issue_at("   ", NOW).await;
        assert!(matches!(result, Err(TokenError::InvalidSubject { .. })));
        assert_eq!(oracle.sign_calls(), 0);
    }

    #[tokio::test]
    async fn test_signing_faults() {
        let (service, _) = service_with(
            HonestOracle::new(KEY).with_sign_failure(OracleError::unavailable("unreachable")),
        );
        let result = service.issue_at("alice", NOW).await;
        assert!(matches!(result, Err(TokenError::SigningUnavailable { .. })));

        let (service, _) = service_with(
            HonestOracle::new(KEY).with_sign_failure(OracleError::rejected("disabled")),
        );
        let result = service.issue_at("alice", NOW).await;
        assert!(matches!(result, Err(TokenError::SigningRejected { .. })));
    }

    #[tokio::test]
    async fn test_verification_fault_is_not_a_rejection() {
        let issued = service().issue_at("alice", NOW).await.unwrap();

        let (service, _) = service_with(
            HonestOracle::new(KEY).with_verify_failure(OracleError::unavailable("unreachable")),
        );
        let result = service.verify_at(&issued.token, NOW).await;

        let err = result.unwrap_err();
        assert!(matches!(err, TokenError::VerificationUnavailable { .. }));
        assert!(!err.is_rejection());
    }

    #[tokio::test]
    async fn test_token_from_other_key_is_invalid() {
        let other = TokenService::new(
            Arc::new(HonestOracle::new("alias/other")),
            KeyReference::new("alias/other").unwrap(),
            ClaimsPolicy::default(),
        );
        let issued = other.issue_at("alice", NOW).await.unwrap();

        let result = service().verify_at(&issued.token, NOW).await;
        assert!(matches!(result, Err(TokenError::SignatureInvalid)));
    }
}
