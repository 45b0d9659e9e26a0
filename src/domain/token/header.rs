use serde::{Deserialize, Serialize};

use crate::domain::signing::SigningAlgorithm;

const TOKEN_TYPE: &str = "JWT";

/// Token header
///
/// Field order is part of the wire format: `alg` then `typ`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Header {
    alg: String,
    typ: String,
}

impl Header {
    pub fn for_algorithm(algorithm: SigningAlgorithm) -> Self {
        Self {
            alg: algorithm.jwt_name().to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }

    pub fn alg(&self) -> &str {
        &self.alg
    }

    pub fn typ(&self) -> &str {
        &self.typ
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::for_algorithm(SigningAlgorithm::default())
    }
}
