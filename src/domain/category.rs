//! Category domain entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Product;

/// Product category. `user_id` is the administrator that created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub category_type: String,
    /// Units of this category's products sold through checkout
    pub sold_product_amount: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Category together with the products filed under it
#[derive(Debug, Clone)]
pub struct CategoryWithProducts {
    pub category: Category,
    pub products: Vec<Product>,
}
