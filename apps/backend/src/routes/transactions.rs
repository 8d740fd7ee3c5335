use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::transactions::{self, TransactionKind};
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::accounts as accounts_repo;
use crate::repos::categories as categories_repo;
use crate::repos::transactions as transactions_repo;
use crate::repos::users as users_repo;
use crate::routes::categories::CategoryResponse;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct TransactionWriteRequest {
    pub amount: Decimal,
    pub description: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub kind: TransactionKind,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub kind: TransactionKind,
    pub created_at: OffsetDateTime,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(txn: transactions::Model) -> Self {
        Self {
            id: txn.id,
            amount: txn.amount,
            description: txn.description,
            account_id: txn.account_id,
            category_id: txn.category_id,
            kind: txn.kind,
            created_at: txn.created_at,
        }
    }
}

impl From<TransactionWriteRequest> for transactions_repo::TransactionWrite {
    fn from(req: TransactionWriteRequest) -> Self {
        Self {
            amount: req.amount,
            description: req.description,
            account_id: req.account_id,
            category_id: req.category_id,
            kind: req.kind,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GroupQuery {
    pub kind: Option<TransactionKind>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub category: CategoryResponse,
    pub transactions: Vec<TransactionResponse>,
}

/// Parse a `YYYY-MM-DD` filter into midnight UTC of that day.
fn parse_date_filter(value: &str) -> Result<OffsetDateTime, AppError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    let date = time::Date::parse(value, &format)
        .map_err(|_| AppError::bad_request(format!("Invalid date filter: {value}")))?;

    Ok(date.midnight().assume_utc())
}

fn date_range(
    from: &Option<String>,
    to: &Option<String>,
) -> Result<(Option<OffsetDateTime>, Option<OffsetDateTime>), AppError> {
    let from = from.as_deref().map(parse_date_filter).transpose()?;
    let to = to.as_deref().map(parse_date_filter).transpose()?;
    Ok((from, to))
}

fn signed_amount(kind: TransactionKind, amount: Decimal) -> Decimal {
    match kind {
        TransactionKind::Income => amount,
        TransactionKind::Spending => -amount,
    }
}

async fn owner_scope(
    db: &sea_orm::DatabaseConnection,
    user: &CurrentUser,
) -> Result<Option<Uuid>, AppError> {
    if users_repo::is_admin(db, user.id).await? {
        Ok(None)
    } else {
        Ok(Some(user.id))
    }
}

async fn list_transactions(
    query: web::Query<ListQuery>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let owner = owner_scope(db, &user).await?;
    let (from, to) = date_range(&query.from, &query.to)?;

    let rows = transactions_repo::list(
        db,
        transactions_repo::TransactionFilter {
            owner,
            from,
            to,
            kind: None,
            limit: query.limit,
        },
    )
    .await?;

    let body: Vec<TransactionResponse> = rows.into_iter().map(TransactionResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_transaction(
    path: web::Path<Uuid>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let owner = owner_scope(db, &user).await?;

    let txn = transactions_repo::find_visible(db, path.into_inner(), owner)
        .await?
        .ok_or_else(|| AppError::not_found("The transaction does not exist"))?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(txn)))
}

async fn create_transaction(
    req: web::Json<TransactionWriteRequest>,
    _user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;

    let account = accounts_repo::find_by_id(db, req.account_id)
        .await?
        .ok_or_else(|| AppError::bad_request("The account does not exist"))?;

    if categories_repo::find_visible(db, req.category_id, None)
        .await?
        .is_none()
    {
        return Err(AppError::bad_request("The category does not exist"));
    }

    let delta = signed_amount(req.kind, req.amount);
    accounts_repo::adjust_balance(db, account, delta).await?;

    transactions_repo::create(db, req.into_inner().into()).await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn update_transaction(
    path: web::Path<Uuid>,
    req: web::Json<TransactionWriteRequest>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let owner = owner_scope(db, &user).await?;

    let existing = transactions_repo::find_visible(db, path.into_inner(), owner)
        .await?
        .ok_or_else(|| AppError::not_found("The transaction does not exist"))?;

    let account = accounts_repo::find_by_id(db, req.account_id)
        .await?
        .ok_or_else(|| AppError::bad_request("The account does not exist"))?;

    // The new signed amount is applied on top of the current balance; the
    // previous effect of this transaction is not reverted.
    let delta = signed_amount(req.kind, req.amount);
    accounts_repo::adjust_balance(db, account, delta).await?;

    transactions_repo::update(db, existing, req.into_inner().into()).await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn delete_transaction(
    path: web::Path<Uuid>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let owner = owner_scope(db, &user).await?;

    let txn = transactions_repo::find_visible(db, path.into_inner(), owner)
        .await?
        .ok_or_else(|| AppError::not_found("The transaction does not exist"))?;

    // The account balance is left untouched on delete.
    transactions_repo::delete(db, txn).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Transactions of one kind, grouped by their category.
async fn group_by_category(
    query: web::Query<GroupQuery>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let owner = owner_scope(db, &user).await?;
    let (from, to) = date_range(&query.from, &query.to)?;

    let rows = transactions_repo::list_with_category(
        db,
        transactions_repo::TransactionFilter {
            owner,
            from,
            to,
            kind: Some(query.kind.unwrap_or(TransactionKind::Spending)),
            limit: None,
        },
    )
    .await?;

    let mut groups: BTreeMap<Uuid, CategoryGroup> = BTreeMap::new();
    for (txn, category) in rows {
        // category_id is a non-null FK; a missing row would mean a broken join
        let Some(category) = category else { continue };
        groups
            .entry(category.id)
            .or_insert_with(|| CategoryGroup {
                category: category.into(),
                transactions: Vec::new(),
            })
            .transactions
            .push(txn.into());
    }

    let body: Vec<CategoryGroup> = groups.into_values().collect();
    Ok(HttpResponse::Ok().json(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_transactions))
            .route(web::post().to(create_transaction)),
    )
    .service(web::resource("/groups/category").route(web::get().to(group_by_category)))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_transaction))
            .route(web::put().to(update_transaction))
            .route(web::delete().to(delete_transaction)),
    );
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{parse_date_filter, signed_amount};
    use crate::entities::transactions::TransactionKind;

    #[test]
    fn test_signed_amount() {
        let amount = Decimal::new(1250, 2); // 12.50
        assert_eq!(signed_amount(TransactionKind::Income, amount), amount);
        assert_eq!(signed_amount(TransactionKind::Spending, amount), -amount);
    }

    #[test]
    fn test_parse_date_filter() {
        let parsed = parse_date_filter("2024-03-01").unwrap();
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month() as u8, 3);
        assert_eq!(parsed.day(), 1);
        assert_eq!(parsed.hour(), 0);

        assert!(parse_date_filter("not-a-date").is_err());
        assert!(parse_date_filter("2024-13-01").is_err());
    }
}
