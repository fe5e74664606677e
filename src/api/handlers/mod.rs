//! HTTP request handlers.

pub mod category_handler;
pub mod product_handler;
pub mod transaction_handler;
pub mod user_handler;

pub use category_handler::category_routes;
pub use product_handler::product_routes;
pub use transaction_handler::transaction_routes;
pub use user_handler::user_routes;
