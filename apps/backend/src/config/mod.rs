//! Environment-driven configuration, resolved once at startup into an
//! explicit struct. Nothing reads ambient configuration after this point.

use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub from_name: String,
    /// Unencrypted transport, local development only
    pub insecure: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub email_token_ttl_minutes: i64,
    /// Base URL used in email verification links
    pub frontend_url: String,
    /// Absent when SMTP_HOST is not set; the email endpoints then refuse
    pub smtp: Option<SmtpConfig>,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{key} is not a valid value: {raw}"))),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::config("DATABASE_URL must be set"))?;
        // The signing key has no default: starting without one would make
        // every issued token unverifiable.
        let jwt_secret = env::var("BACKEND_JWT_SECRET")
            .map_err(|_| AppError::config("BACKEND_JWT_SECRET must be set"))?;
        if jwt_secret.trim().is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) => Some(SmtpConfig {
                host,
                port: env_parse("SMTP_PORT", 587)?,
                username: env_or("SMTP_USERNAME", ""),
                password: env_or("SMTP_PASSWORD", ""),
                from_address: env_or("SMTP_FROM_ADDRESS", "no-reply@localhost"),
                from_name: env_or("SMTP_FROM_NAME", "Billfold"),
                insecure: env_or("SMTP_INSECURE", "false") == "true",
            }),
            Err(_) => None,
        };

        Ok(Self {
            host: env_or("BACKEND_HOST", "0.0.0.0"),
            port: env_parse("BACKEND_PORT", 3001)?,
            database_url,
            jwt_secret,
            access_token_ttl_minutes: env_parse("BACKEND_ACCESS_TOKEN_TTL_MINUTES", 1440)?,
            email_token_ttl_minutes: env_parse("BACKEND_EMAIL_TOKEN_TTL_MINUTES", 10)?,
            frontend_url: env_or("FRONTEND_URL", "http://localhost:3000"),
            smtp,
        })
    }
}
