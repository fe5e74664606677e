//! Repository layer - Data access abstraction
//!
//! One trait per aggregate, each with a SeaORM-backed store and, under
//! `cfg(test)`, a mockall mock.

mod category_repository;
pub(crate) mod entities;
mod product_repository;
mod transaction_repository;
mod user_repository;

pub use category_repository::{CategoryRepository, CategoryStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use transaction_repository::{TransactionRepository, TransactionStore};
pub use user_repository::{UserRepository, UserStore};

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use transaction_repository::MockTransactionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
