use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::jwt::{mint_token, verify_token};
use crate::error::AppError;
use crate::repos::users as users_repo;
use crate::state::app_state::AppState;

const CONFIRM_EMAIL_TEMPLATE: &str = include_str!("../../templates/confirm_email.html");

#[derive(Debug, Deserialize)]
pub struct ConfirmationRequest {
    pub recipient: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub user_id: Uuid,
    pub token: String,
}

/// Send the email-verification message for an account. Exempt from the
/// authorization gate: the short-lived token in the mail is the credential.
async fn send_confirmation(
    req: web::Json<ConfirmationRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let mailer = state.require_mailer()?;

    let user = users_repo::find_by_email(db, &req.recipient)
        .await?
        .ok_or_else(|| AppError::not_found("The user does not exist"))?;

    let token = mint_token(
        &user.id.to_string(),
        &user.full_name(),
        &user.email,
        state.security.email_token_ttl_minutes,
        SystemTime::now(),
        &state.security,
    )?;

    let verify_link = format!(
        "{}/auth/confirm-email?user_id={}&token={}",
        state.frontend_url, user.id, token
    );
    let html = CONFIRM_EMAIL_TEMPLATE
        .replace("%FRONTEND_URL%", &state.frontend_url)
        .replace("%VERIFY_LINK%", &verify_link);
    let text = format!("Open {verify_link} to verify your email address.");

    mailer
        .send_email(&req.recipient, "Verify your email address", &html, &text)
        .await?;

    Ok(HttpResponse::Ok().finish())
}

/// Complete the verification: the token minted by `send_confirmation` must
/// validate and its subject must match the given user id.
async fn verify_email(
    req: web::Json<VerifyRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    let claims = verify_token(&req.token, &state.security)?;
    let subject =
        Uuid::parse_str(&claims.sub).map_err(|_| AppError::UnauthorizedInvalidToken)?;
    if subject != req.user_id {
        return Err(AppError::UnauthorizedInvalidToken);
    }

    let user = users_repo::find_by_id(db, req.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("The user does not exist"))?;

    if !user.is_email_verified {
        users_repo::mark_email_verified(db, user).await?;
    }

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/confirmation").route(web::post().to(send_confirmation)))
        .service(web::resource("/verify").route(web::post().to(verify_email)));
}
