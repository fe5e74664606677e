//! Transaction history repository (read side).
//!
//! Histories are written only by the checkout in the unit of work.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::product::Entity as ProductEntity;
use super::entities::transaction_history::{self, Entity as HistoryEntity};
use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{Product, TransactionDetail, TransactionHistory, User};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Transaction repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Purchases made by one user, newest first
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<TransactionDetail>>;

    /// Every purchase, newest first
    async fn list_all(&self) -> AppResult<Vec<TransactionDetail>>;
}

/// Concrete implementation of TransactionRepository
pub struct TransactionStore {
    db: DatabaseConnection,
}

impl TransactionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load histories with their product, then attach buyers in one query.
    async fn load_details(
        &self,
        user_filter: Option<Uuid>,
    ) -> AppResult<Vec<TransactionDetail>> {
        let mut query = HistoryEntity::find();
        if let Some(user_id) = user_filter {
            query = query.filter(transaction_history::Column::UserId.eq(user_id));
        }

        let rows = query
            .order_by_desc(transaction_history::Column::CreatedAt)
            .find_also_related(ProductEntity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut buyer_ids: Vec<Uuid> = rows.iter().map(|(history, _)| history.user_id).collect();
        buyer_ids.sort_unstable();
        buyer_ids.dedup();

        let buyers: HashMap<Uuid, User> = UserEntity::find()
            .filter(user::Column::Id.is_in(buyer_ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?
            .into_iter()
            .map(|model| (model.id, User::from(model)))
            .collect();

        rows.into_iter()
            .map(|(history, product)| {
                let product = product.ok_or_else(|| {
                    AppError::internal(format!("Transaction {} has no product", history.id))
                })?;
                let user = buyers.get(&history.user_id).cloned().ok_or_else(|| {
                    AppError::internal(format!("Transaction {} has no buyer", history.id))
                })?;

                Ok(TransactionDetail {
                    transaction: TransactionHistory::from(history),
                    product: Product::from(product),
                    user,
                })
            })
            .collect()
    }
}

#[async_trait]
impl TransactionRepository for TransactionStore {
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<TransactionDetail>> {
        self.load_details(Some(user_id)).await
    }

    async fn list_all(&self) -> AppResult<Vec<TransactionDetail>> {
        self.load_details(None).await
    }
}
