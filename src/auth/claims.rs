use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

/// The credential is a signed claims token carrying the subject id and expiry
/// only; everything else about the identity is resolved server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(subject: &str, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: subject.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("64f0a1b2c3d4e5f6a7b8c9d0", 24);

        assert_eq!(claims.sub, "64f0a1b2c3d4e5f6a7b8c9d0");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_negative_expiration_creates_expired_claims() {
        let claims = Claims::new("subject", -1);

        assert!(claims.exp < claims.iat);
    }
}
