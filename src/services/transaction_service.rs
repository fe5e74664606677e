//! Transaction service - checkout and purchase history.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CheckoutOrder, TransactionBill, TransactionDetail};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Transaction service trait for dependency injection.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Buy `quantity` units of a product with the caller's balance
    async fn create_transaction(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> AppResult<TransactionBill>;

    /// Purchases made by the given user
    async fn get_my_transactions(&self, user_id: Uuid) -> AppResult<Vec<TransactionDetail>>;

    /// Purchases made by every user
    async fn get_all_transactions(&self) -> AppResult<Vec<TransactionDetail>>;
}

/// Concrete implementation of TransactionService using Unit of Work.
pub struct TransactionManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TransactionManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TransactionService for TransactionManager<U> {
    async fn create_transaction(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        quantity: i64,
    ) -> AppResult<TransactionBill> {
        if quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        // Fail fast on the common rejections; checkout re-checks under lock.
        let product = self
            .uow
            .products()
            .find_by_id(product_id)
            .await?
            .ok_or_not_found("Product")?;
        product.ensure_stock(quantity)?;
        let total_price = product.total_price(quantity)?;

        let buyer = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;
        buyer.ensure_can_afford(total_price)?;

        let detail = self
            .uow
            .checkout(CheckoutOrder {
                user_id,
                product_id,
                quantity,
            })
            .await?;

        tracing::info!(
            transaction_id = %detail.transaction.id,
            user_id = %user_id,
            product_id = %product_id,
            quantity,
            total_price = detail.transaction.total_price,
            "Checkout completed"
        );

        Ok(TransactionBill::from(&detail))
    }

    async fn get_my_transactions(&self, user_id: Uuid) -> AppResult<Vec<TransactionDetail>> {
        self.uow.transactions().list_by_user(user_id).await
    }

    async fn get_all_transactions(&self) -> AppResult<Vec<TransactionDetail>> {
        self.uow.transactions().list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, TransactionHistory, User, UserRole};
    use crate::infra::repositories::{MockProductRepository, MockUserRepository};
    use crate::infra::{MockUnitOfWork, ProductRepository, UserRepository};
    use chrono::Utc;

    fn product(id: Uuid, price: i64, stock: i64) -> Product {
        Product {
            id,
            title: "Teh Melati".to_string(),
            price,
            stock,
            category_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn buyer(id: Uuid, balance: i64) -> User {
        User {
            id,
            full_name: "Dewi Lestari".to_string(),
            email: "dewi@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Customer,
            balance,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn uow_with(products: MockProductRepository, users: MockUserRepository) -> MockUnitOfWork {
        let products: Arc<dyn ProductRepository> = Arc::new(products);
        let users: Arc<dyn UserRepository> = Arc::new(users);
        let mut uow = MockUnitOfWork::new();
        uow.expect_products().returning(move || products.clone());
        uow.expect_users().returning(move || users.clone());
        uow
    }

    fn stocked(price: i64, stock: i64) -> MockProductRepository {
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |id| Ok(Some(product(id, price, stock))));
        products
    }

    fn funded(balance: i64) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |id| Ok(Some(buyer(id, balance))));
        users
    }

    #[tokio::test]
    async fn test_checkout_returns_bill() {
        let mut uow = uow_with(stocked(15_000, 10), funded(100_000));
        uow.expect_checkout().times(1).returning(|order| {
            let now = Utc::now();
            Ok(TransactionDetail {
                transaction: TransactionHistory {
                    id: Uuid::new_v4(),
                    product_id: order.product_id,
                    user_id: order.user_id,
                    quantity: order.quantity,
                    total_price: 15_000 * order.quantity,
                    created_at: now,
                    updated_at: now,
                },
                product: product(order.product_id, 15_000, 10 - order.quantity),
                user: buyer(order.user_id, 100_000 - 15_000 * order.quantity),
            })
        });

        let service = TransactionManager::new(Arc::new(uow));
        let bill = service
            .create_transaction(Uuid::new_v4(), Uuid::new_v4(), 3)
            .await
            .unwrap();

        assert_eq!(
            bill,
            TransactionBill {
                total_price: 45_000,
                quantity: 3,
                product_title: "Teh Melati".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_checkout_unknown_product() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));
        let mut uow = uow_with(products, MockUserRepository::new());
        uow.expect_checkout().never();

        let result = TransactionManager::new(Arc::new(uow))
            .create_transaction(Uuid::new_v4(), Uuid::new_v4(), 1)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "Product"));
    }

    #[tokio::test]
    async fn test_checkout_insufficient_stock() {
        let mut uow = uow_with(stocked(15_000, 2), funded(1_000_000));
        uow.expect_checkout().never();

        let result = TransactionManager::new(Arc::new(uow))
            .create_transaction(Uuid::new_v4(), Uuid::new_v4(), 5)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_checkout_insufficient_balance() {
        let mut uow = uow_with(stocked(15_000, 10), funded(20_000));
        uow.expect_checkout().never();

        let result = TransactionManager::new(Arc::new(uow))
            .create_transaction(Uuid::new_v4(), Uuid::new_v4(), 2)
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg == "Insufficient balance"));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let uow = MockUnitOfWork::new();
        let result = TransactionManager::new(Arc::new(uow))
            .create_transaction(Uuid::new_v4(), Uuid::new_v4(), 0)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
