//! Authentication service - registration, login and token verification.
//!
//! Password hashing lives in the domain `Password` value object; this
//! service only issues and checks JWTs.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful login
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token, sent back as `Authorization: Bearer <token>`
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

/// Registration data after request validation
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user with the given role
    async fn register(&self, registration: Registration, role: UserRole) -> AppResult<User>;

    /// Login and return JWT token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse { token })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration, role: UserRole) -> AppResult<User> {
        let email = registration.email.trim().to_lowercase();

        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email has already been registered"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                full_name: registration.full_name,
                email,
                password_hash,
                role,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::conflict("Email has already been registered"),
                other => other,
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let email = email.trim().to_lowercase();
        let user_result = self.uow.users().find_by_email(&email).await?;

        // Verify against a dummy hash when the user is unknown so both paths cost the same.
        let dummy_hash = "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let password_hash = match &user_result {
            Some(user) => user.password_hash.as_str(),
            None => dummy_hash,
        };

        let password_valid = Password::from_hash(password_hash.to_string()).verify(&password);

        match user_result {
            Some(user) if password_valid => generate_token(&user, &self.config),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockUserRepository;
    use crate::infra::{MockUnitOfWork, UserRepository};

    fn test_config() -> Config {
        Config::new("postgres://unused", "test-secret-key-for-testing-only-32chars")
    }

    fn stored_user(email: &str, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Siti Aminah".to_string(),
            email: email.to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: UserRole::Customer,
            balance: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service_with(repo: MockUserRepository) -> Authenticator<MockUnitOfWork> {
        let repo: Arc<dyn UserRepository> = Arc::new(repo);
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || repo.clone());
        Authenticator::new(Arc::new(uow), test_config())
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "secret123"))));
        repo.expect_create().never();

        let service = service_with(repo);
        let result = service
            .register(
                Registration {
                    full_name: "Siti".to_string(),
                    email: "siti@example.com".to_string(),
                    password: "secret123".to_string(),
                },
                UserRole::Customer,
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_losing_email_race_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|_| Err(AppError::conflict("Resource already exists")));

        let result = service_with(repo)
            .register(
                Registration {
                    full_name: "Siti".to_string(),
                    email: "siti@example.com".to_string(),
                    password: "secret123".to_string(),
                },
                UserRole::Customer,
            )
            .await;

        assert!(
            matches!(result, Err(AppError::Conflict(msg)) if msg == "Email has already been registered")
        );
    }

    #[tokio::test]
    async fn test_register_hashes_password_and_normalizes_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|new_user| {
            assert_eq!(new_user.email, "siti@example.com");
            assert_ne!(new_user.password_hash, "secret123");
            assert_eq!(new_user.role, UserRole::Customer);
            Ok(User {
                id: Uuid::new_v4(),
                full_name: new_user.full_name,
                email: new_user.email,
                password_hash: new_user.password_hash,
                role: new_user.role,
                balance: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

        let service = service_with(repo);
        let user = service
            .register(
                Registration {
                    full_name: "Siti".to_string(),
                    email: "  Siti@Example.com ".to_string(),
                    password: "secret123".to_string(),
                },
                UserRole::Customer,
            )
            .await
            .unwrap();

        assert_eq!(user.balance, 0);
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "secret123"))));

        let service = service_with(repo);
        let token = service
            .login("siti@example.com".to_string(), "secret123".to_string())
            .await
            .unwrap();

        let claims = service.verify_token(&token.token).unwrap();
        assert_eq!(claims.email, "siti@example.com");
        assert_eq!(claims.role, "customer");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "secret123"))));

        let service = service_with(repo);
        let result = service
            .login("siti@example.com".to_string(), "wrong-pass".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = service_with(repo);
        let result = service
            .login("nobody@example.com".to_string(), "secret123".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let user = stored_user("siti@example.com", "secret123");
        let other = Config::new("postgres://unused", "another-secret-key-that-is-32-chars!");
        let token = generate_token(&user, &other).unwrap();

        let err = verify_token_internal(&token.token, &test_config()).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
