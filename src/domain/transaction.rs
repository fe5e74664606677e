//! Transaction history (checkout) types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Product, User};

/// A completed purchase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionHistory {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i64,
    pub total_price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction joined with the purchased product and the buyer
#[derive(Debug, Clone)]
pub struct TransactionDetail {
    pub transaction: TransactionHistory,
    pub product: Product,
    pub user: User,
}

/// A purchase request handed to the unit of work. Price, stock and
/// balance are re-read under lock when it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOrder {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Bill returned to the buyer after a successful checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionBill {
    pub total_price: i64,
    pub quantity: i64,
    pub product_title: String,
}

impl From<&TransactionDetail> for TransactionBill {
    fn from(detail: &TransactionDetail) -> Self {
        Self {
            total_price: detail.transaction.total_price,
            quantity: detail.transaction.quantity,
            product_title: detail.product.title.clone(),
        }
    }
}
