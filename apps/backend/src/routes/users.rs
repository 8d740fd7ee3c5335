use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::mint_token;
use crate::auth::password::{hash_password, verify_password};
use crate::entities::users::{self, UserRole};
use crate::error::AppError;
use crate::repos::users as users_repo;
use crate::state::app_state::AppState;

/// Body for register and update; the password arrives as plaintext and is
/// stored only as its digest.
#[derive(Debug, Deserialize)]
pub struct UserWriteRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_email_verified: bool,
    pub role: UserRole,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_email_verified: user.is_email_verified,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
}

impl From<UserWriteRequest> for users_repo::UserWrite {
    fn from(req: UserWriteRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password_hash: hash_password(&req.password),
        }
    }
}

/// Register a new user. Exempt from the authorization gate.
async fn create_user(
    req: web::Json<UserWriteRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    if users_repo::find_by_email(db, &req.email).await?.is_some() {
        return Err(AppError::bad_request(
            "A user with that email already exists",
        ));
    }

    let user = users_repo::create(db, req.into_inner().into()).await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(HttpResponse::NoContent().finish())
}

/// Exchange credentials for an access token. Exempt from the gate.
async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    let user = users_repo::find_by_email(db, &req.email).await?;
    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        // unknown email and digest mismatch are indistinguishable on the wire
        _ => return Err(AppError::unauthorized_msg("Invalid email or password")),
    };

    if !user.is_email_verified {
        return Err(AppError::unauthorized_msg(
            "Your email address has not been verified",
        ));
    }

    let access_token = mint_token(
        &user.id.to_string(),
        &user.full_name(),
        &user.email,
        state.security.access_token_ttl_minutes,
        SystemTime::now(),
        &state.security,
    )?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: user.into(),
        access_token,
    }))
}

// The remaining handlers require authentication but perform no ownership
// check: any authenticated user may read or modify any user record.

async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let users = users_repo::list(db).await?;

    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_user(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    let user = users_repo::find_by_id(db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("The user does not exist"))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

async fn update_user(
    path: web::Path<Uuid>,
    req: web::Json<UserWriteRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    let existing = users_repo::find_by_id(db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("The user does not exist"))?;

    users_repo::update(db, existing, req.into_inner().into()).await?;

    Ok(HttpResponse::Ok().finish())
}

async fn delete_user(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    let user = users_repo::find_by_id(db, path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("The user does not exist"))?;

    users_repo::delete(db, user).await?;

    Ok(HttpResponse::Ok().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_users))
            .route(web::post().to(create_user)),
    )
    .service(web::resource("/login").route(web::post().to(login)))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_user))
            .route(web::put().to(update_user))
            .route(web::delete().to(delete_user)),
    );
}
