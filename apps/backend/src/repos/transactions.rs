use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, JoinType,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::transactions::{self, TransactionKind};
use crate::entities::{accounts, categories};

#[derive(Debug, Clone)]
pub struct TransactionWrite {
    pub amount: Decimal,
    pub description: String,
    pub account_id: Uuid,
    pub category_id: Uuid,
    pub kind: TransactionKind,
}

/// Query filter for transaction listings. `owner: None` is the admin view.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub owner: Option<Uuid>,
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
    pub kind: Option<TransactionKind>,
    pub limit: Option<u64>,
}

fn restriction(filter: &TransactionFilter) -> Condition {
    Condition::all()
        .add_option(
            filter
                .from
                .map(|from| transactions::Column::CreatedAt.gte(from)),
        )
        .add_option(filter.to.map(|to| transactions::Column::CreatedAt.lte(to)))
        .add_option(filter.kind.map(|kind| transactions::Column::Kind.eq(kind)))
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: TransactionFilter,
) -> Result<Vec<transactions::Model>, DbErr> {
    let mut query = transactions::Entity::find()
        .filter(restriction(&filter))
        .order_by_desc(transactions::Column::CreatedAt)
        .limit(filter.limit);

    if let Some(owner) = filter.owner {
        query = query
            .join(JoinType::InnerJoin, transactions::Relation::Account.def())
            .filter(accounts::Column::UserId.eq(owner));
    }

    query.all(conn).await
}

/// Listing with each transaction's category, for the group-by-category view.
pub async fn list_with_category<C: ConnectionTrait>(
    conn: &C,
    filter: TransactionFilter,
) -> Result<Vec<(transactions::Model, Option<categories::Model>)>, DbErr> {
    let mut query = transactions::Entity::find()
        .find_also_related(categories::Entity)
        .filter(restriction(&filter))
        .order_by_desc(transactions::Column::CreatedAt)
        .limit(filter.limit);

    if let Some(owner) = filter.owner {
        query = query
            .join(JoinType::InnerJoin, transactions::Relation::Account.def())
            .filter(accounts::Column::UserId.eq(owner));
    }

    query.all(conn).await
}

/// Fetch a transaction the caller is allowed to see, through its owning
/// account. `owner: None` skips the ownership restriction (admin).
pub async fn find_visible<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    owner: Option<Uuid>,
) -> Result<Option<transactions::Model>, DbErr> {
    let mut query = transactions::Entity::find_by_id(id);

    if let Some(owner) = owner {
        query = query
            .join(JoinType::InnerJoin, transactions::Relation::Account.def())
            .filter(accounts::Column::UserId.eq(owner));
    }

    query.one(conn).await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    write: TransactionWrite,
) -> Result<transactions::Model, DbErr> {
    let transaction = transactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        amount: Set(write.amount),
        description: Set(write.description),
        account_id: Set(write.account_id),
        category_id: Set(write.category_id),
        kind: Set(write.kind),
        created_at: Set(OffsetDateTime::now_utc()),
    };

    transaction.insert(conn).await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    existing: transactions::Model,
    write: TransactionWrite,
) -> Result<transactions::Model, DbErr> {
    let mut transaction: transactions::ActiveModel = existing.into();
    transaction.amount = Set(write.amount);
    transaction.description = Set(write.description);
    transaction.account_id = Set(write.account_id);
    transaction.category_id = Set(write.category_id);
    transaction.kind = Set(write.kind);

    transaction.update(conn).await
}

pub async fn delete<C: ConnectionTrait>(
    conn: &C,
    transaction: transactions::Model,
) -> Result<(), DbErr> {
    transaction.delete(conn).await.map(|_| ())
}

/// Used by the category delete guard.
pub async fn count_for_category<C: ConnectionTrait>(
    conn: &C,
    category_id: Uuid,
) -> Result<u64, DbErr> {
    transactions::Entity::find()
        .filter(transactions::Column::CategoryId.eq(category_id))
        .count(conn)
        .await
}
