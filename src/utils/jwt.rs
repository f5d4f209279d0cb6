use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub sid: Uuid,   // session row id
    pub exp: i64,    // expiration timestamp
    pub iat: i64,    // issued at timestamp
}

pub fn create_token(
    user_id: &str,
    session_id: Uuid,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    secret: &str,
) -> AppResult<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        sid: session_id,
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
}

/// Expiry is reported as `SessionExpired`; any other failure is a bad token.
pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::SessionExpired,
        _ => AppError::Unauthorized(format!("Invalid session token: {}", e)),
    })
}

pub fn expiry_from(now: DateTime<Utc>, ttl_hours: i64) -> DateTime<Utc> {
    now + Duration::hours(ttl_hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_carries_session_id() {
        let now = Utc::now();
        let sid = Uuid::new_v4();
        let token = create_token("u0001", sid, now, expiry_from(now, 1), SECRET).unwrap();

        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "u0001");
        assert_eq!(claims.sid, sid);
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let now = Utc::now();
        let token =
            create_token("u0001", Uuid::new_v4(), now, expiry_from(now, 1), SECRET).unwrap();

        assert!(matches!(
            verify_token(&token, "other-secret"),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_is_session_expired() {
        let issued = Utc::now() - Duration::hours(3);
        let token = create_token(
            "u0001",
            Uuid::new_v4(),
            issued,
            expiry_from(issued, 1),
            SECRET,
        )
        .unwrap();

        assert!(matches!(
            verify_token(&token, SECRET),
            Err(AppError::SessionExpired)
        ));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            verify_token("not-a-jwt", SECRET),
            Err(AppError::Unauthorized(_))
        ));
    }
}
