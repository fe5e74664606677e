//! SeaORM entity definitions
//!
//! Database-specific models, kept separate from the domain types they
//! convert into.

pub mod category;
pub mod product;
pub mod transaction_history;
pub mod user;
