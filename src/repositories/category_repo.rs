//! Category persistence.
//!
//! [`CategoryStore`] is the seam the service depends on; [`CategoryRepository`]
//! implements it over the async diesel pool.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult, DatabaseErrorConverter};
use crate::models::{Category, CategoryChanges, NewCategory};

/// Persistent store of categories and their menu associations.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Category>>;

    /// Inserts a new row and returns it with the assigned id.
    async fn create(&self, new_category: NewCategory) -> AppResult<Category>;

    /// Writes name, description and image of an existing row.
    async fn save(&self, category: &Category) -> AppResult<Category>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete_by_id(&self, id: i32) -> AppResult<usize>;

    /// All categories ordered by ascending id.
    async fn list_all(&self) -> AppResult<Vec<Category>>;

    /// Removes every menu association of the category.
    async fn detach_menus(&self, category_id: i32) -> AppResult<usize>;
}

/// Category repository holding an async connection pool.
///
/// `AsyncDbPool` is reference counted, so cloning is cheap.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: AsyncDbPool,
}

impl CategoryRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn find_by_id(&self, category_id: i32) -> AppResult<Option<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        categories
            .filter(id.eq(category_id))
            .select(Category::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn create(&self, new_category: NewCategory) -> AppResult<Category> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(categories)
            .values(&new_category)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "create category"))
    }

    async fn save(&self, category: &Category) -> AppResult<Category> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(categories.filter(id.eq(category.id)))
            .set((CategoryChanges::from(category), updated_at.eq(diesel::dsl::now)))
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => AppError::not_found("Category", category.id),
                other => DatabaseErrorConverter::convert_diesel_error(other, "save category"),
            })
    }

    async fn delete_by_id(&self, category_id: i32) -> AppResult<usize> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(categories.filter(id.eq(category_id)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "delete category"))
    }

    async fn list_all(&self) -> AppResult<Vec<Category>> {
        use crate::schema::categories::dsl::*;
        let mut conn = self.pool.get().await?;

        categories
            .order(id.asc())
            .select(Category::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn detach_menus(&self, target: i32) -> AppResult<usize> {
        use crate::schema::category_menu::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(category_menu.filter(category_id.eq(target)))
            .execute(&mut conn)
            .await
            .map_err(|e| DatabaseErrorConverter::convert_diesel_error(e, "detach menus"))
    }
}
