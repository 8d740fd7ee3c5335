use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::accounts::{self, AccountKind};
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::accounts as accounts_repo;
use crate::repos::users as users_repo;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct AccountWriteRequest {
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub user_id: Uuid,
}

impl From<accounts::Model> for AccountResponse {
    fn from(account: accounts::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            kind: account.kind,
            balance: account.balance,
            user_id: account.user_id,
        }
    }
}

impl From<AccountWriteRequest> for accounts_repo::AccountWrite {
    fn from(req: AccountWriteRequest) -> Self {
        Self {
            name: req.name,
            kind: req.kind,
            balance: req.balance,
            user_id: req.user_id,
        }
    }
}

/// Admins see every account, everyone else their own.
async fn list_accounts(
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    let accounts = if users_repo::is_admin(db, user.id).await? {
        accounts_repo::list_all(db).await?
    } else {
        accounts_repo::list_for_user(db, user.id).await?
    };

    let body: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_account(
    path: web::Path<Uuid>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let is_admin = users_repo::is_admin(db, user.id).await?;

    let account = accounts_repo::find_visible(db, path.into_inner(), user.id, is_admin)
        .await?
        .ok_or_else(|| AppError::not_found("The account does not exist"))?;

    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

async fn create_account(
    req: web::Json<AccountWriteRequest>,
    _user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    accounts_repo::create(db, req.into_inner().into()).await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn update_account(
    path: web::Path<Uuid>,
    req: web::Json<AccountWriteRequest>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let is_admin = users_repo::is_admin(db, user.id).await?;

    let existing = accounts_repo::find_visible(db, path.into_inner(), user.id, is_admin)
        .await?
        .ok_or_else(|| AppError::not_found("The account does not exist"))?;

    accounts_repo::update(db, existing, req.into_inner().into()).await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn delete_account(
    path: web::Path<Uuid>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let is_admin = users_repo::is_admin(db, user.id).await?;

    let account = accounts_repo::find_visible(db, path.into_inner(), user.id, is_admin)
        .await?
        .ok_or_else(|| AppError::not_found("The account does not exist"))?;

    accounts_repo::delete(db, account).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_accounts))
            .route(web::post().to(create_account)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_account))
            .route(web::put().to(update_account))
            .route(web::delete().to(delete_account)),
    );
}
