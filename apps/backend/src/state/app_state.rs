use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::services::email::EmailSender;

use super::security_config::SecurityConfig;

/// Application state shared across workers.
///
/// Everything here is read-only after startup; the database connection is a
/// pool and the mailer is behind an `Arc`, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional so gate/codec tests can run without one)
    pub db: Option<DatabaseConnection>,
    /// JWT signing key and token lifetimes
    pub security: SecurityConfig,
    /// Outbound mailer; absent when SMTP is not configured
    pub mailer: Option<Arc<dyn EmailSender>>,
    /// Base URL of the frontend, used to build verification links
    pub frontend_url: String,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
            mailer: None,
            frontend_url: String::new(),
        }
    }

    /// State without a database connection, for handler-level tests.
    pub fn without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            mailer: None,
            frontend_url: String::new(),
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn EmailSender>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn with_frontend_url(mut self, frontend_url: impl Into<String>) -> Self {
        self.frontend_url = frontend_url.into();
        self
    }

    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::internal("Database connection not available"))
    }

    pub fn require_mailer(&self) -> Result<&Arc<dyn EmailSender>, AppError> {
        self.mailer
            .as_ref()
            .ok_or_else(|| AppError::config("SMTP mailer is not configured"))
    }
}
