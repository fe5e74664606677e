//! Application state - Dependency injection container.
//!
//! Provides handlers and interceptors with the application services and
//! the database handle used by the health check.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, CategoryService, ProductService, ServiceContainer, Services, TransactionService,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub category_service: Arc<dyn CategoryService>,
    pub product_service: Arc<dyn ProductService>,
    pub transaction_service: Arc<dyn TransactionService>,
    /// Database handle; `None` when the state is built from bare services
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state from a connected database and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        let mut state = Self::new(&container);
        state.database = Some(database);
        state
    }

    /// Create application state from any service container.
    pub fn new(container: &dyn ServiceContainer) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            category_service: container.categories(),
            product_service: container.products(),
            transaction_service: container.transactions(),
            database: None,
        }
    }
}
