use chrono::Utc;

use super::Claims;

/// One day
pub const DEFAULT_VALIDITY_SECS: i64 = 86_400;

/// Decides claim contents and the validity window
#[derive(Debug, Clone, Copy)]
pub struct ClaimsPolicy {
    validity_secs: i64,
}

impl ClaimsPolicy {
    pub fn new(validity_secs: i64) -> Self {
        Self { validity_secs }
    }

    pub fn validity_secs(&self) -> i64 {
        self.validity_secs
    }

    /// Fresh claims for `subject`, issued now
    pub fn issue(&self, subject: &str) -> Claims {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Expiry saturates at `i64::MAX` rather than wrapping
    pub fn issue_at(&self, subject: &str, now: i64) -> Claims {
        Claims::new(subject, now, now.saturating_add(self.validity_secs))
    }

    /// A token stays valid through the second it expires at
    pub fn is_expired(&self, claims: &Claims, now: i64) -> bool {
        now > claims.expires_at()
    }
}

impl Default for ClaimsPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDITY_SECS)
    }
}
