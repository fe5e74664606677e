//! Category repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::category::{self, ActiveModel, Entity as CategoryEntity};
use super::entities::product::{self, Entity as ProductEntity};
use crate::domain::{Category, CategoryWithProducts, Product};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Category repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// All categories, oldest first, each with its products
    async fn list_with_products(&self) -> AppResult<Vec<CategoryWithProducts>>;

    async fn create(&self, owner_id: Uuid, category_type: String) -> AppResult<Category>;

    async fn update_type(&self, id: Uuid, category_type: String) -> AppResult<Category>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Number of products filed under the category
    async fn count_products(&self, id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of CategoryRepository
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Category::from))
    }

    async fn list_with_products(&self) -> AppResult<Vec<CategoryWithProducts>> {
        let rows = CategoryEntity::find()
            .order_by_asc(category::Column::CreatedAt)
            .find_with_related(ProductEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(category, products)| CategoryWithProducts {
                category: Category::from(category),
                products: products.into_iter().map(Product::from).collect(),
            })
            .collect())
    }

    async fn create(&self, owner_id: Uuid, category_type: String) -> AppResult<Category> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            category_type: Set(category_type),
            sold_product_amount: Set(0),
            user_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Category::from(model))
    }

    async fn update_type(&self, id: Uuid, category_type: String) -> AppResult<Category> {
        let category = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;

        let mut active: ActiveModel = category.into();
        active.category_type = Set(category_type);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = CategoryEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Category"));
        }

        Ok(())
    }

    async fn count_products(&self, id: Uuid) -> AppResult<u64> {
        ProductEntity::find()
            .filter(product::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
            .map_err(Into::into)
    }
}
