use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::categories;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::categories as categories_repo;
use crate::repos::transactions as transactions_repo;
use crate::repos::users as users_repo;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryWriteRequest {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub user_id: Option<Uuid>,
}

impl From<categories::Model> for CategoryResponse {
    fn from(category: categories::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            icon: category.icon,
            color: category.color,
            user_id: category.user_id,
        }
    }
}

fn default_page_number() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page_number")]
    pub page_number: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

/// Paged response envelope.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub data: T,
    pub page_number: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub total_records: u64,
}

impl<T> Paged<T> {
    pub fn new(data: T, page_number: u64, page_size: u64, total_records: u64) -> Self {
        let total_pages = if page_size == 0 {
            0
        } else {
            total_records.div_ceil(page_size)
        };

        Self {
            data,
            page_number,
            page_size,
            total_pages,
            total_records,
        }
    }
}

/// Resolve the caller's visibility scope: admins see everything (`None`),
/// everyone else their own categories plus the global ones.
async fn viewer_scope(
    db: &sea_orm::DatabaseConnection,
    user: &CurrentUser,
) -> Result<Option<Uuid>, AppError> {
    if users_repo::is_admin(db, user.id).await? {
        Ok(None)
    } else {
        Ok(Some(user.id))
    }
}

async fn list_categories(
    query: web::Query<PageQuery>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let viewer = viewer_scope(db, &user).await?;

    let categories =
        categories_repo::page_visible(db, viewer, query.page_number, query.page_size).await?;
    let total_records = categories_repo::count_all(db).await?;

    let data: Vec<CategoryResponse> = categories
        .into_iter()
        .map(CategoryResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(Paged::new(
        data,
        query.page_number,
        query.page_size,
        total_records,
    )))
}

async fn get_category(
    path: web::Path<Uuid>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let viewer = viewer_scope(db, &user).await?;

    let category = categories_repo::find_visible(db, path.into_inner(), viewer)
        .await?
        .ok_or_else(|| AppError::not_found("The category does not exist"))?;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

async fn create_category(
    req: web::Json<CategoryWriteRequest>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let viewer = viewer_scope(db, &user).await?;

    if categories_repo::find_by_name_visible(db, &req.name, viewer)
        .await?
        .is_some()
    {
        return Err(AppError::bad_request(
            "A category with that name already exists",
        ));
    }

    let req = req.into_inner();
    categories_repo::create(
        db,
        categories_repo::CategoryWrite {
            name: req.name,
            description: req.description,
            icon: req.icon,
            color: req.color,
            user_id: Some(user.id),
        },
    )
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn update_category(
    path: web::Path<Uuid>,
    req: web::Json<CategoryWriteRequest>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let viewer = viewer_scope(db, &user).await?;

    let existing = categories_repo::find_visible(db, path.into_inner(), viewer)
        .await?
        .ok_or_else(|| AppError::not_found("The category does not exist"))?;

    let req = req.into_inner();
    let write = categories_repo::CategoryWrite {
        name: req.name,
        description: req.description,
        icon: req.icon,
        color: req.color,
        // ownership is not transferable through updates
        user_id: existing.user_id,
    };
    categories_repo::update(db, existing, write).await?;

    Ok(HttpResponse::NoContent().finish())
}

async fn delete_category(
    path: web::Path<Uuid>,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = state.require_db()?;
    let viewer = viewer_scope(db, &user).await?;

    let category = categories_repo::find_visible(db, path.into_inner(), viewer)
        .await?
        .ok_or_else(|| AppError::not_found("The category does not exist"))?;

    if transactions_repo::count_for_category(db, category.id).await? > 0 {
        return Err(AppError::bad_request(
            "There are transactions registered with this category",
        ));
    }

    categories_repo::delete(db, category).await?;

    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_categories))
            .route(web::post().to(create_category)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_category))
            .route(web::put().to(update_category))
            .route(web::delete().to(delete_category)),
    );
}

#[cfg(test)]
mod tests {
    use super::Paged;

    #[test]
    fn test_total_pages_rounds_up() {
        let paged = Paged::new(Vec::<u8>::new(), 1, 10, 25);
        assert_eq!(paged.total_pages, 3);

        let exact = Paged::new(Vec::<u8>::new(), 1, 10, 30);
        assert_eq!(exact.total_pages, 3);

        let empty = Paged::new(Vec::<u8>::new(), 1, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
