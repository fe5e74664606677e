//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{MAX_BALANCE, ROLE_ADMIN, ROLE_CUSTOMER};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::Customer,
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::Customer => write!(f, "{}", ROLE_CUSTOMER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// Spendable balance in rupiah
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Balance after crediting `amount`, rejecting results above the cap.
    pub fn balance_after_top_up(&self, amount: i64) -> AppResult<i64> {
        if amount <= 0 {
            return Err(AppError::validation("Top up amount must be greater than 0"));
        }

        match self.balance.checked_add(amount) {
            Some(total) if total <= MAX_BALANCE => Ok(total),
            _ => Err(AppError::bad_request(format!(
                "Balance cannot exceed Rp {}",
                MAX_BALANCE
            ))),
        }
    }

    /// Fail unless the balance covers `total_price`.
    pub fn ensure_can_afford(&self, total_price: i64) -> AppResult<()> {
        if self.balance < total_price {
            return Err(AppError::bad_request("Insufficient balance"));
        }
        Ok(())
    }
}

/// Data needed to persist a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Registered user projection (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
    #[schema(example = "budi@example.com")]
    pub email: String,
    #[schema(example = 0)]
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            balance: user.balance,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_balance(balance: i64) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hashed".to_string(),
            role: UserRole::Customer,
            balance,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("customer"), UserRole::Customer);
        assert_eq!(UserRole::from("unknown"), UserRole::Customer);
        assert_eq!(UserRole::Admin.to_string(), "admin");
    }

    #[test]
    fn test_top_up_within_cap() {
        let user = user_with_balance(1_000);
        assert_eq!(user.balance_after_top_up(500).unwrap(), 1_500);
    }

    #[test]
    fn test_top_up_exactly_to_cap() {
        let user = user_with_balance(MAX_BALANCE - 10);
        assert_eq!(user.balance_after_top_up(10).unwrap(), MAX_BALANCE);
    }

    #[test]
    fn test_top_up_over_cap_rejected() {
        let user = user_with_balance(MAX_BALANCE);
        let err = user.balance_after_top_up(1).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_top_up_non_positive_rejected() {
        let user = user_with_balance(0);
        assert!(user.balance_after_top_up(0).is_err());
        assert!(user.balance_after_top_up(-5).is_err());
    }

    #[test]
    fn test_ensure_can_afford() {
        let user = user_with_balance(100);
        assert!(user.ensure_can_afford(100).is_ok());
        assert!(user.ensure_can_afford(101).is_err());
    }

    #[test]
    fn test_user_response_hides_password() {
        let response = UserResponse::from(user_with_balance(0));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("role").is_none());
    }
}
