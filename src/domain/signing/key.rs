use std::fmt;

use crate::domain::TokenError;

/// Opaque alias the oracle resolves to a concrete key pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyReference(String);

impl KeyReference {
    pub fn new(value: impl Into<String>) -> Result<Self, TokenError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(TokenError::configuration("Key reference cannot be empty"));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
