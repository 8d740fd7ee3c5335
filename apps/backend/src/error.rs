use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {detail}")]
    BadRequest { detail: String },
    #[error("Not found: {detail}")]
    NotFound { detail: String },
    #[error("Unauthorized: {detail}")]
    Unauthorized { detail: String },
    #[error("Token expired")]
    UnauthorizedExpiredToken,
    #[error("Invalid token")]
    UnauthorizedInvalidToken,
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal {
        detail: String,
        exception: Option<String>,
    },
}

impl AppError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::BadRequest {
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    /// The fixed gate rejection: 401 with body `{"error": "Unauthorized"}`.
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            detail: "Unauthorized".to_string(),
        }
    }

    pub fn unauthorized_msg(detail: impl Into<String>) -> Self {
        Self::Unauthorized {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
            exception: None,
        }
    }

    /// 500 carrying the underlying failure in the `exception` field.
    pub fn internal_with_exception(
        detail: impl Into<String>,
        exception: impl std::fmt::Display,
    ) -> Self {
        Self::Internal {
            detail: detail.into(),
            exception: Some(exception.to_string()),
        }
    }

    /// The user-visible `error` field of the response body.
    fn message(&self) -> String {
        match self {
            AppError::BadRequest { detail } => detail.clone(),
            AppError::NotFound { detail } => detail.clone(),
            AppError::Unauthorized { detail } => detail.clone(),
            AppError::UnauthorizedExpiredToken => "Token expired".to_string(),
            AppError::UnauthorizedInvalidToken => "Invalid token".to_string(),
            AppError::Db { .. } => "An unexpected error has occurred".to_string(),
            AppError::Config { .. } => "An unexpected error has occurred".to_string(),
            AppError::Internal { detail, .. } => detail.clone(),
        }
    }

    fn exception(&self) -> Option<String> {
        match self {
            AppError::Internal { exception, .. } => exception.clone(),
            _ => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::UnauthorizedInvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Db { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }

        HttpResponse::build(status).json(ErrorBody {
            error: self.message(),
            exception: self.exception(),
        })
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::db(format!("db error: {e}"))
    }
}
