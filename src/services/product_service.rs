//! Product service - catalogue management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{MAX_PRODUCT_PRICE, MIN_PRODUCT_STOCK};
use crate::domain::{Product, ProductInput};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    /// List a new product under an existing category
    async fn create_product(&self, owner_id: Uuid, input: ProductInput) -> AppResult<Product>;

    async fn get_all_products(&self) -> AppResult<Vec<Product>>;

    async fn get_product(&self, id: Uuid) -> AppResult<Product>;

    /// Replace every writable field; the target category must exist
    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Product>;

    async fn delete_product(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProductService using Unit of Work.
pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn checked_input(&self, mut input: ProductInput) -> AppResult<ProductInput> {
        input.title = input.title.trim().to_string();
        if input.title.is_empty() {
            return Err(AppError::validation("Title is required"));
        }
        if !(0..=MAX_PRODUCT_PRICE).contains(&input.price) {
            return Err(AppError::validation(format!(
                "Price must be between 0 and {}",
                MAX_PRODUCT_PRICE
            )));
        }
        if input.stock < MIN_PRODUCT_STOCK {
            return Err(AppError::validation(format!(
                "Stock must be at least {}",
                MIN_PRODUCT_STOCK
            )));
        }

        self.uow
            .categories()
            .find_by_id(input.category_id)
            .await?
            .ok_or_not_found("Category")?;

        Ok(input)
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn create_product(&self, owner_id: Uuid, input: ProductInput) -> AppResult<Product> {
        let input = self.checked_input(input).await?;
        let product = self.uow.products().create(owner_id, input).await?;

        tracing::info!(product_id = %product.id, category_id = %product.category_id, "Product created");
        Ok(product)
    }

    async fn get_all_products(&self) -> AppResult<Vec<Product>> {
        self.uow.products().list().await
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn update_product(&self, id: Uuid, input: ProductInput) -> AppResult<Product> {
        let input = self.checked_input(input).await?;
        self.uow.products().update(id, input).await
    }

    async fn delete_product(&self, id: Uuid) -> AppResult<()> {
        self.uow.products().delete(id).await?;
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use crate::infra::repositories::{MockCategoryRepository, MockProductRepository};
    use crate::infra::{CategoryRepository, MockUnitOfWork, ProductRepository};
    use chrono::Utc;

    fn input(category_id: Uuid, price: i64, stock: i64) -> ProductInput {
        ProductInput {
            title: "Sepatu Lari".to_string(),
            price,
            stock,
            category_id,
        }
    }

    fn stored(owner_id: Uuid, input: ProductInput) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: input.title,
            price: input.price,
            stock: input.stock,
            category_id: input.category_id,
            user_id: owner_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service_with(
        categories: MockCategoryRepository,
        products: MockProductRepository,
    ) -> ProductManager<MockUnitOfWork> {
        let categories: Arc<dyn CategoryRepository> = Arc::new(categories);
        let products: Arc<dyn ProductRepository> = Arc::new(products);
        let mut uow = MockUnitOfWork::new();
        uow.expect_categories().returning(move || categories.clone());
        uow.expect_products().returning(move || products.clone());
        ProductManager::new(Arc::new(uow))
    }

    fn existing_category() -> MockCategoryRepository {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|id| {
            Ok(Some(Category {
                id,
                category_type: "Olahraga".to_string(),
                sold_product_amount: 0,
                user_id: Uuid::new_v4(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });
        categories
    }

    #[tokio::test]
    async fn test_create_product() {
        let owner = Uuid::new_v4();
        let mut products = MockProductRepository::new();
        products
            .expect_create()
            .times(1)
            .returning(|owner_id, input| Ok(stored(owner_id, input)));

        let service = service_with(existing_category(), products);
        let product = service
            .create_product(owner, input(Uuid::new_v4(), 250_000, 10))
            .await
            .unwrap();

        assert_eq!(product.price, 250_000);
        assert!(product.is_owned_by(owner));
    }

    #[tokio::test]
    async fn test_create_product_unknown_category() {
        let mut categories = MockCategoryRepository::new();
        categories.expect_find_by_id().returning(|_| Ok(None));
        let mut products = MockProductRepository::new();
        products.expect_create().never();

        let result = service_with(categories, products)
            .create_product(Uuid::new_v4(), input(Uuid::new_v4(), 1_000, 10))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Category"));
    }

    #[tokio::test]
    async fn test_price_and_stock_limits() {
        let service = service_with(MockCategoryRepository::new(), MockProductRepository::new());

        let too_expensive = service
            .create_product(Uuid::new_v4(), input(Uuid::new_v4(), 50_000_001, 10))
            .await;
        assert!(matches!(too_expensive, Err(AppError::Validation(_))));

        let low_stock = service
            .create_product(Uuid::new_v4(), input(Uuid::new_v4(), 1_000, 4))
            .await;
        assert!(matches!(low_stock, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_product_passes_through_repository() {
        let id = Uuid::new_v4();
        let mut products = MockProductRepository::new();
        products.expect_update().times(1).returning(move |_, input| {
            let mut product = stored(Uuid::new_v4(), input);
            product.id = id;
            Ok(product)
        });

        let updated = service_with(existing_category(), products)
            .update_product(id, input(Uuid::new_v4(), 300_000, 7))
            .await
            .unwrap();

        assert_eq!(updated.id, id);
        assert_eq!(updated.stock, 7);
    }
}
