use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::accounts::{self, AccountKind};

#[derive(Debug, Clone)]
pub struct AccountWrite {
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub user_id: Uuid,
}

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .order_by_asc(accounts::Column::CreatedAt)
        .all(conn)
        .await
}

pub async fn list_for_user<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<Vec<accounts::Model>, DbErr> {
    accounts::Entity::find()
        .filter(accounts::Column::UserId.eq(user_id))
        .order_by_asc(accounts::Column::CreatedAt)
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find_by_id(id).one(conn).await
}

/// Fetch an account the caller is allowed to see: owned by `user_id`, or
/// anything when the caller is an admin.
pub async fn find_visible<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    user_id: Uuid,
    is_admin: bool,
) -> Result<Option<accounts::Model>, DbErr> {
    let mut query = accounts::Entity::find_by_id(id);
    if !is_admin {
        query = query.filter(accounts::Column::UserId.eq(user_id));
    }

    query.one(conn).await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    write: AccountWrite,
) -> Result<accounts::Model, DbErr> {
    let now = OffsetDateTime::now_utc();
    let account = accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(write.name),
        kind: Set(write.kind),
        balance: Set(write.balance),
        user_id: Set(write.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    account.insert(conn).await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    existing: accounts::Model,
    write: AccountWrite,
) -> Result<accounts::Model, DbErr> {
    let mut account: accounts::ActiveModel = existing.into();
    account.name = Set(write.name);
    account.kind = Set(write.kind);
    account.balance = Set(write.balance);
    account.user_id = Set(write.user_id);
    account.updated_at = Set(OffsetDateTime::now_utc());

    account.update(conn).await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, account: accounts::Model) -> Result<(), DbErr> {
    account.delete(conn).await.map(|_| ())
}

/// Apply a signed delta to the stored balance.
pub async fn adjust_balance<C: ConnectionTrait>(
    conn: &C,
    account: accounts::Model,
    delta: Decimal,
) -> Result<accounts::Model, DbErr> {
    let balance = account.balance + delta;
    let mut account: accounts::ActiveModel = account.into();
    account.balance = Set(balance);
    account.updated_at = Set(OffsetDateTime::now_utc());

    account.update(conn).await
}
