//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: Uuid,
    /// Login code: the supplier or driver register code, or an admin username.
    pub login: String,
    /// Account role (`supplier`, `driver`, `admin`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(account_id: Uuid, login: &str, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            login: login.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Supplier code, driver code or admin username.
    pub login: String,
    /// Account password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
    /// Account role.
    pub role: String,
    /// Login code the token was issued for.
    pub login: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let account_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(account_id, "S1001", "supplier", expires_at);

        assert_eq!(claims.account_id(), account_id);
        assert_eq!(claims.login, "S1001");
        assert_eq!(claims.role, "supplier");
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }
}
