//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories and owns the one multi-aggregate
//! write in the system: the checkout, which touches a product, a user, a
//! category and the transaction history in a single database transaction.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IsolationLevel, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{category, product, transaction_history, user};
use super::repositories::{
    CategoryRepository, CategoryStore, ProductRepository, ProductStore, TransactionRepository,
    TransactionStore, UserRepository, UserStore,
};
use crate::domain::{CheckoutOrder, Product, TransactionDetail, TransactionHistory, User};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(test)]
use mockall::automock;

/// Unit of Work trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn categories(&self) -> Arc<dyn CategoryRepository>;

    fn products(&self) -> Arc<dyn ProductRepository>;

    fn transactions(&self) -> Arc<dyn TransactionRepository>;

    /// Apply a purchase atomically: take stock, debit the buyer, bump the
    /// category's sold amount and record the history row.
    ///
    /// Rolls back and returns the error if any rule fails under lock.
    async fn checkout(&self, order: CheckoutOrder) -> AppResult<TransactionDetail>;
}

/// Repository access scoped to an open database transaction.
///
/// Rows read here are locked `FOR UPDATE` until commit or rollback.
struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    async fn lock_product(&self, id: Uuid) -> AppResult<product::Model> {
        product::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .ok_or_not_found("Product")
    }

    async fn lock_user(&self, id: Uuid) -> AppResult<user::Model> {
        user::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .ok_or_not_found("User")
    }

    async fn lock_category(&self, id: Uuid) -> AppResult<category::Model> {
        category::Entity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .ok_or_not_found("Category")
    }

    /// Validate and apply every checkout write inside the transaction.
    async fn apply_checkout(&self, order: &CheckoutOrder) -> AppResult<TransactionDetail> {
        let product_row = self.lock_product(order.product_id).await?;
        let item = Product::from(product_row.clone());
        item.ensure_stock(order.quantity)?;
        let total_price = item.total_price(order.quantity)?;

        let buyer_row = self.lock_user(order.user_id).await?;
        User::from(buyer_row.clone()).ensure_can_afford(total_price)?;

        let category_row = self.lock_category(item.category_id).await?;

        let now = chrono::Utc::now();

        let mut product_active: product::ActiveModel = product_row.into();
        product_active.stock = Set(item.stock - order.quantity);
        product_active.updated_at = Set(now);
        let product_row = product_active.update(self.txn).await?;

        let mut buyer_active: user::ActiveModel = buyer_row.clone().into();
        buyer_active.balance = Set(buyer_row.balance - total_price);
        buyer_active.updated_at = Set(now);
        let buyer_row = buyer_active.update(self.txn).await?;

        let sold = category_row.sold_product_amount + order.quantity;
        let mut category_active: category::ActiveModel = category_row.into();
        category_active.sold_product_amount = Set(sold);
        category_active.updated_at = Set(now);
        category_active.update(self.txn).await?;

        let history_row = transaction_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(order.product_id),
            user_id: Set(order.user_id),
            quantity: Set(order.quantity),
            total_price: Set(total_price),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.txn)
        .await?;

        Ok(TransactionDetail {
            transaction: TransactionHistory::from(history_row),
            product: Product::from(product_row),
            user: User::from(buyer_row),
        })
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    category_repo: Arc<CategoryStore>,
    product_repo: Arc<ProductStore>,
    transaction_repo: Arc<TransactionStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            category_repo: Arc::new(CategoryStore::new(db.clone())),
            product_repo: Arc::new(ProductStore::new(db.clone())),
            transaction_repo: Arc::new(TransactionStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.category_repo.clone()
    }

    fn products(&self) -> Arc<dyn ProductRepository> {
        self.product_repo.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        self.transaction_repo.clone()
    }

    async fn checkout(&self, order: CheckoutOrder) -> AppResult<TransactionDetail> {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match ctx.apply_checkout(&order).await {
            Ok(detail) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(detail)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Checkout rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
