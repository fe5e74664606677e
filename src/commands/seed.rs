//! Seed command - Creates the administrator account.
//!
//! Safe to run repeatedly: an existing account with the configured email
//! is left untouched.

use std::sync::Arc;

use crate::config::Config;
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{AuthService, Authenticator, Registration};

/// Execute the seed-admin command
pub async fn execute(config: Config) -> AppResult<()> {
    let password = config
        .admin_password()
        .ok_or_else(|| AppError::internal("ADMIN_PASSWORD must be set to seed the admin account"))?
        .to_string();

    let db = Database::connect(&config).await?;
    let uow = Arc::new(Persistence::new(db.get_connection()));

    match seed_admin(uow, config, password).await? {
        Some(admin) => {
            tracing::info!(user_id = %admin.id, email = %admin.email, "Admin account created")
        }
        None => tracing::info!("Admin account already exists, nothing to do"),
    }
    Ok(())
}

/// Create the configured admin unless an account with that email exists.
/// Returns the new account, or `None` when nothing was created.
async fn seed_admin<U: UnitOfWork>(
    uow: Arc<U>,
    config: Config,
    password: String,
) -> AppResult<Option<User>> {
    // Stored emails are normalized on registration.
    let email = config.admin_email.trim().to_lowercase();
    let full_name = config.admin_full_name.clone();

    if uow.users().find_by_email(&email).await?.is_some() {
        return Ok(None);
    }

    let admin = Authenticator::new(uow, config)
        .register(
            Registration {
                full_name,
                email,
                password,
            },
            UserRole::Admin,
        )
        .await?;

    Ok(Some(admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockUserRepository;
    use crate::infra::{MockUnitOfWork, UserRepository};
    use chrono::Utc;
    use mockall::predicate::*;
    use uuid::Uuid;

    fn config_with_email(email: &str) -> Config {
        let mut config = Config::new("postgres://unused", "test-secret-key-for-testing-only-32chars");
        config.admin_email = email.to_string();
        config
    }

    fn uow_with(repo: MockUserRepository) -> Arc<MockUnitOfWork> {
        let repo: Arc<dyn UserRepository> = Arc::new(repo);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || repo.clone());
        Arc::new(uow)
    }

    fn admin(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Admin Toko".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Admin,
            balance: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_existing_admin_found_by_normalized_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("admin@toko.com"))
            .returning(|email| Ok(Some(admin(email))));
        repo.expect_create().never();

        let seeded = seed_admin(
            uow_with(repo),
            config_with_email(" Admin@Toko.com "),
            "secret123".to_string(),
        )
        .await
        .unwrap();

        assert!(seeded.is_none());
    }

    #[tokio::test]
    async fn test_creates_admin_when_missing() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|new_user| {
            assert_eq!(new_user.role, UserRole::Admin);
            Ok(admin(&new_user.email))
        });

        let seeded = seed_admin(
            uow_with(repo),
            config_with_email("Admin@Toko.com"),
            "secret123".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(seeded.map(|u| u.email).as_deref(), Some("admin@toko.com"));
    }
}
