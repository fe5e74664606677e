//! Domain layer - Core business entities and rules
//!
//! Entities here are independent of the database and HTTP layers.

pub mod category;
pub mod password;
pub mod product;
pub mod transaction;
pub mod user;

pub use category::{Category, CategoryWithProducts};
pub use password::Password;
pub use product::{Product, ProductInput};
pub use transaction::{CheckoutOrder, TransactionBill, TransactionDetail, TransactionHistory};
pub use user::{NewUser, User, UserResponse, UserRole};
