//! Local RSA signing oracle for development and self-hosted deployments

use async_trait::async_trait;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::RsaPrivateKey;
use sha2::Sha256;

use crate::domain::{KeyReference, OracleError, SigningAlgorithm, SigningOracle, TokenError};

/// RSASSA-PKCS1-v1_5 SHA-256 signer over a single in-process key
pub struct LocalRsaOracle {
    key: KeyReference,
    signing_key: SigningKey<Sha256>,
    verifying_key: VerifyingKey<Sha256>,
}

impl std::fmt::Debug for LocalRsaOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalRsaOracle")
            .field("key", &self.key)
            .field("signing_key", &"[hidden]")
            .finish()
    }
}

impl LocalRsaOracle {
    pub fn from_private_key(key: KeyReference, private_key: RsaPrivateKey) -> Self {
        let verifying_key = VerifyingKey::<Sha256>::new(private_key.to_public_key());
        let signing_key = SigningKey::<Sha256>::new(private_key);

        Self {
            key,
            signing_key,
            verifying_key,
        }
    }

    /// Load a PKCS#8 or PKCS#1 PEM private key
    pub fn from_pem(key: KeyReference, pem: &str) -> Result<Self, TokenError> {
        let private_key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|e| TokenError::configuration(format!("Invalid RSA private key: {}", e)))?;

        Ok(Self::from_private_key(key, private_key))
    }

    fn check_request(&self, key: &KeyReference, algorithm: SigningAlgorithm) -> Result<(), OracleError> {
        if key != &self.key {
            return Err(OracleError::rejected(format!("Key '{}' not found", key)));
        }

        match algorithm {
            SigningAlgorithm::RsassaPkcs1V15Sha256 => Ok(()),
        }
    }
}

#[async_trait]
impl SigningOracle for LocalRsaOracle {
    async fn sign(
        &self,
        key: &KeyReference,
        message: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<Vec<u8>, OracleError> {
        self.check_request(key, algorithm)?;

        let signature = self
            .signing_key
            .try_sign(message)
            .map_err(|e| OracleError::unavailable(format!("RSA signing failed: {}", e)))?;

        Ok(signature.to_vec())
    }

    async fn verify(
        &self,
        key: &KeyReference,
        message: &[u8],
        signature: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<bool, OracleError> {
        self.check_request(key, algorithm)?;

        let Ok(signature) = Signature::try_from(signature) else {
            return Ok(false);
        };

        Ok(self.verifying_key.verify(message, &signature).is_ok())
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
