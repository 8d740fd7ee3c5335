use jsonwebtoken::Algorithm;

/// JWT security settings: the symmetric signing key and the two token
/// lifetimes this service issues (session access vs. email verification).
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Symmetric key used both to sign and to verify tokens
    pub jwt_secret: Vec<u8>,
    /// JWT algorithm (HS256)
    pub algorithm: Algorithm,
    /// Access-token lifetime in minutes
    pub access_token_ttl_minutes: i64,
    /// Email-verification-token lifetime in minutes
    pub email_token_ttl_minutes: i64,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given signing key and the
    /// default lifetimes (1 day for access tokens, 10 minutes for email
    /// verification tokens).
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            access_token_ttl_minutes: 1440,
            email_token_ttl_minutes: 10,
        }
    }

    pub fn with_ttls(mut self, access_minutes: i64, email_minutes: i64) -> Self {
        self.access_token_ttl_minutes = access_minutes;
        self.email_token_ttl_minutes = email_minutes;
        self
    }
}
