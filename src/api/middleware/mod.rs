//! API middleware.

mod auth;

pub use auth::{
    admin_middleware, auth_middleware, authenticate, category_owner_middleware,
    product_owner_middleware, require_admin, require_owner, CurrentUser,
};
