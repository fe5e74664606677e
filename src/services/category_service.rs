//! Category service - admin-managed product categories.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Category, CategoryWithProducts};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Category service trait for dependency injection.
#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn create_category(&self, owner_id: Uuid, category_type: String) -> AppResult<Category>;

    /// Every category together with its products
    async fn get_all_categories(&self) -> AppResult<Vec<CategoryWithProducts>>;

    async fn get_category(&self, id: Uuid) -> AppResult<Category>;

    async fn update_category(&self, id: Uuid, category_type: String) -> AppResult<Category>;

    /// Delete a category. Fails with 409 while products still reference it.
    async fn delete_category(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CategoryService using Unit of Work.
pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    fn checked_type(category_type: String) -> AppResult<String> {
        let category_type = category_type.trim();
        if category_type.is_empty() {
            return Err(AppError::validation("Type is required"));
        }
        Ok(category_type.to_string())
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn create_category(&self, owner_id: Uuid, category_type: String) -> AppResult<Category> {
        let category_type = Self::checked_type(category_type)?;
        let category = self
            .uow
            .categories()
            .create(owner_id, category_type)
            .await?;

        tracing::info!(category_id = %category.id, owner_id = %owner_id, "Category created");
        Ok(category)
    }

    async fn get_all_categories(&self) -> AppResult<Vec<CategoryWithProducts>> {
        self.uow.categories().list_with_products().await
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")
    }

    async fn update_category(&self, id: Uuid, category_type: String) -> AppResult<Category> {
        let category_type = Self::checked_type(category_type)?;
        self.uow.categories().update_type(id, category_type).await
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        let categories = self.uow.categories();

        if categories.count_products(id).await? > 0 {
            return Err(AppError::conflict("Category still has products"));
        }

        // A product added after the count trips the foreign key instead.
        categories.delete(id).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("Category still has products"),
            other => other,
        })?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
