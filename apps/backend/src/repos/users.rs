//! User repository: free functions generic over `ConnectionTrait`.
//! Storage failures surface as `DbErr`; routes map them to `AppError`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::users::{self, UserRole};

/// Field set shared by create and update.
#[derive(Debug, Clone)]
pub struct UserWrite {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
}

pub async fn list<C: ConnectionTrait>(conn: &C) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::CreatedAt)
        .all(conn)
        .await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    write: UserWrite,
) -> Result<users::Model, DbErr> {
    let now = OffsetDateTime::now_utc();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(write.first_name),
        last_name: Set(write.last_name),
        email: Set(write.email),
        password_hash: Set(write.password_hash),
        is_email_verified: Set(false),
        role: Set(UserRole::User),
        created_at: Set(now),
        updated_at: Set(now),
    };

    user.insert(conn).await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    existing: users::Model,
    write: UserWrite,
) -> Result<users::Model, DbErr> {
    let mut user: users::ActiveModel = existing.into();
    user.first_name = Set(write.first_name);
    user.last_name = Set(write.last_name);
    user.email = Set(write.email);
    user.password_hash = Set(write.password_hash);
    user.updated_at = Set(OffsetDateTime::now_utc());

    user.update(conn).await
}

pub async fn delete<C: ConnectionTrait>(conn: &C, user: users::Model) -> Result<(), DbErr> {
    user.delete(conn).await.map(|_| ())
}

pub async fn mark_email_verified<C: ConnectionTrait>(
    conn: &C,
    user: users::Model,
) -> Result<users::Model, DbErr> {
    let mut user: users::ActiveModel = user.into();
    user.is_email_verified = Set(true);
    user.updated_at = Set(OffsetDateTime::now_utc());

    user.update(conn).await
}

/// Admin check used by the ownership policies of the entity endpoints.
pub async fn is_admin<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<bool, DbErr> {
    let user = find_by_id(conn, user_id).await?;
    Ok(user.is_some_and(|u| u.is_admin()))
}
