//! Product domain entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Sellable product. `user_id` is the administrator that listed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub price: i64,
    pub stock: i64,
    pub category_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Fail unless `quantity` units are in stock.
    pub fn ensure_stock(&self, quantity: i64) -> AppResult<()> {
        if quantity <= 0 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }
        if self.stock < quantity {
            return Err(AppError::bad_request(format!(
                "Insufficient stock for {}: {} left",
                self.title, self.stock
            )));
        }
        Ok(())
    }

    /// Price of `quantity` units.
    pub fn total_price(&self, quantity: i64) -> AppResult<i64> {
        self.price
            .checked_mul(quantity)
            .ok_or_else(|| AppError::bad_request("Order total is too large"))
    }
}

/// Writable product fields, shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub title: String,
    pub price: i64,
    pub stock: i64,
    pub category_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, stock: i64) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "Kopi Gayo".to_string(),
            price,
            stock,
            category_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ensure_stock() {
        let item = product(10_000, 5);
        assert!(item.ensure_stock(5).is_ok());
        assert!(matches!(item.ensure_stock(6), Err(AppError::BadRequest(_))));
        assert!(matches!(item.ensure_stock(0), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_total_price() {
        assert_eq!(product(12_500, 10).total_price(3).unwrap(), 37_500);
    }

    #[test]
    fn test_total_price_overflow() {
        assert!(product(i64::MAX, 10).total_price(2).is_err());
    }

    #[test]
    fn test_ownership() {
        let item = product(1, 5);
        assert!(item.is_owned_by(item.user_id));
        assert!(!item.is_owned_by(Uuid::new_v4()));
    }
}
