//! Product repository implementation.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{Product, ProductInput};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Product repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// All products, oldest first
    async fn list(&self) -> AppResult<Vec<Product>>;

    async fn create(&self, owner_id: Uuid, input: ProductInput) -> AppResult<Product>;

    async fn update(&self, id: Uuid, input: ProductInput) -> AppResult<Product>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProductRepository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let result = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    async fn list(&self) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .order_by_asc(product::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn create(&self, owner_id: Uuid, input: ProductInput) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            price: Set(input.price),
            stock: Set(input.stock),
            category_id: Set(input.category_id),
            user_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn update(&self, id: Uuid, input: ProductInput) -> AppResult<Product> {
        let product = ProductEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))?;

        let mut active: ActiveModel = product.into();
        active.title = Set(input.title);
        active.price = Set(input.price);
        active.stock = Set(input.stock);
        active.category_id = Set(input.category_id);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Product::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ProductEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Product"));
        }

        Ok(())
    }
}
