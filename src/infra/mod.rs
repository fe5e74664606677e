//! Infrastructure layer - External systems integration
//!
//! - PostgreSQL connection and migrations
//! - SeaORM repositories
//! - Unit of Work (repository access and the transactional checkout)

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    CategoryRepository, CategoryStore, ProductRepository, ProductStore, TransactionRepository,
    TransactionStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(test)]
pub use unit_of_work::MockUnitOfWork;
