//! User service - account lookups and balance top-up.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::User;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Credit `amount` to the user's balance and return the updated user
    async fn top_up(&self, id: Uuid, amount: i64) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn top_up(&self, id: Uuid, amount: i64) -> AppResult<User> {
        let user = self.get_user(id).await?;
        let new_balance = user.balance_after_top_up(amount)?;

        let updated = self
            .uow
            .users()
            .swap_balance(id, user.balance, new_balance)
            .await?
            .ok_or_else(|| AppError::conflict("Balance was modified concurrently, please retry"))?;

        tracing::info!(user_id = %id, amount, balance = updated.balance, "Balance topped up");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::repositories::MockUserRepository;
    use crate::infra::{MockUnitOfWork, UserRepository};
    use chrono::Utc;
    use mockall::predicate::*;

    fn user_with_balance(id: Uuid, balance: i64) -> User {
        User {
            id,
            full_name: "Budi Santoso".to_string(),
            email: "budi@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Customer,
            balance,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service_with(repo: MockUserRepository) -> UserManager<MockUnitOfWork> {
        let repo: Arc<dyn UserRepository> = Arc::new(repo);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || repo.clone());
        UserManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service_with(repo).get_user(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "User"));
    }

    #[tokio::test]
    async fn test_top_up_credits_balance() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some(user_with_balance(id, 50_000))));
        repo.expect_swap_balance()
            .with(eq(id), eq(50_000), eq(150_000))
            .times(1)
            .returning(move |_, _, new_balance| Ok(Some(user_with_balance(id, new_balance))));

        let user = service_with(repo).top_up(id, 100_000).await.unwrap();
        assert_eq!(user.balance, 150_000);
    }

    #[tokio::test]
    async fn test_top_up_over_cap_is_rejected_before_write() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user_with_balance(id, 99_000_000))));
        repo.expect_swap_balance().never();

        let result = service_with(repo).top_up(id, 2_000_000).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_top_up_lost_race_is_conflict() {
        let id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user_with_balance(id, 0))));
        repo.expect_swap_balance().returning(|_, _, _| Ok(None));

        let result = service_with(repo).top_up(id, 10_000).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
