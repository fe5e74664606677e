//! Service Container - centralized access to every application service.
//!
//! Handlers never see concrete services; they get `Arc<dyn ...>` handles
//! from the container, which makes the router testable with mocks.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, CategoryManager, CategoryService, ProductManager, ProductService,
    TransactionManager, TransactionService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn categories(&self) -> Arc<dyn CategoryService>;

    fn products(&self) -> Arc<dyn ProductService>;

    fn transactions(&self) -> Arc<dyn TransactionService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    category_service: Arc<dyn CategoryService>,
    product_service: Arc<dyn ProductService>,
    transaction_service: Arc<dyn TransactionService>,
}

impl Services {
    /// Assemble a container from already-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        category_service: Arc<dyn CategoryService>,
        product_service: Arc<dyn ProductService>,
        transaction_service: Arc<dyn TransactionService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            category_service,
            product_service,
            transaction_service,
        }
    }

    /// Wire every service over one shared Unit of Work
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            category_service: Arc::new(CategoryManager::new(uow.clone())),
            product_service: Arc::new(ProductManager::new(uow.clone())),
            transaction_service: Arc::new(TransactionManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn products(&self) -> Arc<dyn ProductService> {
        self.product_service.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionService> {
        self.transaction_service.clone()
    }
}
