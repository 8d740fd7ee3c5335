use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::categories;

#[derive(Debug, Clone)]
pub struct CategoryWrite {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub user_id: Option<Uuid>,
}

/// Visibility scope for category queries: `None` is the admin view (no
/// filter), `Some(user)` restricts to the user's own plus global rows.
fn visibility_condition(viewer: Option<Uuid>) -> Option<Condition> {
    viewer.map(|user_id| {
        Condition::any()
            .add(categories::Column::UserId.eq(user_id))
            .add(categories::Column::UserId.is_null())
    })
}

/// One page of visible categories. Pages are 1-based.
pub async fn page_visible<C: ConnectionTrait>(
    conn: &C,
    viewer: Option<Uuid>,
    page_number: u64,
    page_size: u64,
) -> Result<Vec<categories::Model>, DbErr> {
    let mut query = categories::Entity::find().order_by_asc(categories::Column::Name);
    if let Some(condition) = visibility_condition(viewer) {
        query = query.filter(condition);
    }

    query
        .paginate(conn, page_size.max(1))
        .fetch_page(page_number.max(1) - 1)
        .await
}

pub async fn count_all<C: ConnectionTrait>(conn: &C) -> Result<u64, DbErr> {
    categories::Entity::find().count(conn).await
}

pub async fn find_visible<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    viewer: Option<Uuid>,
) -> Result<Option<categories::Model>, DbErr> {
    let mut query = categories::Entity::find_by_id(id);
    if let Some(condition) = visibility_condition(viewer) {
        query = query.filter(condition);
    }

    query.one(conn).await
}

/// Duplicate-name lookup within the caller's visible scope.
pub async fn find_by_name_visible<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    viewer: Option<Uuid>,
) -> Result<Option<categories::Model>, DbErr> {
    let mut query = categories::Entity::find().filter(categories::Column::Name.eq(name));
    if let Some(condition) = visibility_condition(viewer) {
        query = query.filter(condition);
    }

    query.one(conn).await
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    write: CategoryWrite,
) -> Result<categories::Model, DbErr> {
    let now = OffsetDateTime::now_utc();
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(write.name),
        description: Set(write.description),
        icon: Set(write.icon),
        color: Set(write.color),
        user_id: Set(write.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    category.insert(conn).await
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    existing: categories::Model,
    write: CategoryWrite,
) -> Result<categories::Model, DbErr> {
    let mut category: categories::ActiveModel = existing.into();
    category.name = Set(write.name);
    category.description = Set(write.description);
    category.icon = Set(write.icon);
    category.color = Set(write.color);
    category.user_id = Set(write.user_id);
    category.updated_at = Set(OffsetDateTime::now_utc());

    category.update(conn).await
}

pub async fn delete<C: ConnectionTrait>(
    conn: &C,
    category: categories::Model,
) -> Result<(), DbErr> {
    category.delete(conn).await.map(|_| ())
}
