use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Claims carried by every token this service issues. Access tokens and
/// short-lived email-verification tokens use the same shape.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id, as a string
    pub sub: String,
    /// Display name
    pub name: String,
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch); always `iat + lifetime * 60`
    pub exp: i64,
}

/// Mint an HS256 JWT for the given identity with a caller-supplied lifetime.
///
/// The signing key comes from [`SecurityConfig`]; an empty key is a
/// configuration error, not a signable state.
pub fn mint_token(
    sub: &str,
    name: &str,
    email: &str,
    lifetime_minutes: i64,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    if security.jwt_secret.is_empty() {
        return Err(AppError::config("JWT signing key is not configured"));
    }

    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;
    let exp = iat + lifetime_minutes * 60;

    let claims = Claims {
        sub: sub.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token and return its claims.
///
/// Expired tokens and bad signatures map to distinct unauthorized variants;
/// any other decode failure collapses to `UnauthorizedInvalidToken`.
pub fn verify_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::new(security.algorithm);
    // exp is checked against wall-clock time with no leeway
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::UnauthorizedExpiredToken,
        _ => AppError::UnauthorizedInvalidToken,
    })
}

/// Collapse every failure path to "no identity".
///
/// Empty or whitespace input, malformed tokens, bad signatures, and expired
/// tokens all return `None`; this never panics. Callers that need to know
/// *why* a token was rejected use [`verify_token`] instead.
pub fn validate_token(token: &str, security: &SecurityConfig) -> Option<Claims> {
    if token.trim().is_empty() {
        return None;
    }

    verify_token(token.trim(), security).ok()
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::{mint_token, validate_token, verify_token};
    use crate::error::AppError;
    use crate::state::security_config::SecurityConfig;

    fn test_security() -> SecurityConfig {
        SecurityConfig::new("test_secret_key_for_testing_purposes_only".as_bytes())
    }

    #[test]
    fn test_mint_and_validate_roundtrip() {
        let security = test_security();
        let now = SystemTime::now();

        let token = mint_token(
            "11111111-1111-1111-1111-111111111111",
            "Jane Doe",
            "jane@example.com",
            1440,
            now,
            &security,
        )
        .unwrap();

        let claims = validate_token(&token, &security).expect("freshly minted token is valid");
        assert_eq!(claims.sub, "11111111-1111-1111-1111-111111111111");
        assert_eq!(claims.name, "Jane Doe");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(
            claims.iat,
            now.duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
        );
        assert_eq!(claims.exp, claims.iat + 1440 * 60);
    }

    #[test]
    fn test_expired_token() {
        let security = test_security();
        // Minted two hours ago with a 10-minute lifetime
        let now = SystemTime::now() - Duration::from_secs(2 * 60 * 60);

        let token = mint_token("sub-1", "A B", "a@example.com", 10, now, &security).unwrap();

        match verify_token(&token, &security) {
            Err(AppError::UnauthorizedExpiredToken) => {}
            other => panic!("expected expired-token error, got {other:?}"),
        }
        assert!(validate_token(&token, &security).is_none());
    }

    #[test]
    fn test_wrong_key_fails() {
        let security_a = SecurityConfig::new("secret-A".as_bytes());
        let security_b = SecurityConfig::new("secret-B".as_bytes());

        let token = mint_token(
            "sub-2",
            "A B",
            "a@example.com",
            60,
            SystemTime::now(),
            &security_a,
        )
        .unwrap();

        assert!(validate_token(&token, &security_b).is_none());
        assert!(validate_token(&token, &security_a).is_some());
    }

    #[test]
    fn test_garbage_input_returns_none() {
        let security = test_security();

        assert!(validate_token("", &security).is_none());
        assert!(validate_token("   ", &security).is_none());
        assert!(validate_token("garbage.not.a.token", &security).is_none());
        assert!(validate_token("a.b", &security).is_none());
    }

    #[test]
    fn test_empty_signing_key_is_config_error() {
        let security = SecurityConfig::new(Vec::new());

        match mint_token("sub-3", "A B", "a@example.com", 60, SystemTime::now(), &security) {
            Err(AppError::Config { .. }) => {}
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
