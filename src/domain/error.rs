use thiserror::Error;

/// Token issuance and verification errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Malformed token: {message}")]
    MalformedToken { message: String },

    #[error("Signature invalid")]
    SignatureInvalid,

    #[error("Token expired at {expires_at}")]
    Expired { expires_at: i64 },

    #[error("Signing unavailable: {message}")]
    SigningUnavailable { message: String },

    #[error("Signing rejected: {message}")]
    SigningRejected { message: String },

    #[error("Verification unavailable: {message}")]
    VerificationUnavailable { message: String },

    #[error("Invalid subject: {message}")]
    InvalidSubject { message: String },

    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl TokenError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    pub fn expired(expires_at: i64) -> Self {
        Self::Expired { expires_at }
    }

    pub fn signing_unavailable(message: impl Into<String>) -> Self {
        Self::SigningUnavailable {
            message: message.into(),
        }
    }

    pub fn signing_rejected(message: impl Into<String>) -> Self {
        Self::SigningRejected {
            message: message.into(),
        }
    }

    pub fn verification_unavailable(message: impl Into<String>) -> Self {
        Self::VerificationUnavailable {
            message: message.into(),
        }
    }

    pub fn invalid_subject(message: impl Into<String>) -> Self {
        Self::InvalidSubject {
            message: message.into(),
        }
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for outcomes caused by the presented token itself.
    ///
    /// These are reported to clients as a single, uniform rejection.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken { .. } | Self::SignatureInvalid | Self::Expired { .. }
        )
    }

    /// True for oracle transport faults that a caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SigningUnavailable { .. } | Self::VerificationUnavailable { .. }
        )
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. } => "malformed_token",
            Self::SignatureInvalid => "signature_invalid",
            Self::Expired { .. } => "expired",
            Self::SigningUnavailable { .. } => "signing_unavailable",
            Self::SigningRejected { .. } => "signing_rejected",
            Self::VerificationUnavailable { .. } => "verification_unavailable",
            Self::InvalidSubject { .. } => "invalid_subject",
            Self::Encoding { .. } => "encoding",
            Self::Configuration { .. } => "configuration",
        }
    }
}
