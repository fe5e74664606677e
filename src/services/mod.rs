//! Application services layer - use cases and business logic.
//!
//! Services orchestrate domain rules and persistence. Each one is a trait
//! with a single Unit of Work backed implementation, so handlers and tests
//! depend on the abstraction only.

mod auth_service;
mod category_service;
pub mod container;
mod product_service;
mod transaction_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use category_service::{CategoryManager, CategoryService};
pub use product_service::{ProductManager, ProductService};
pub use transaction_service::{TransactionManager, TransactionService};
pub use user_service::{UserManager, UserService};
