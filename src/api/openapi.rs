//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{category_handler, product_handler, transaction_handler, user_handler};
use crate::domain::UserResponse;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Toko Belanja API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Toko Belanja API",
        version = "0.1.0",
        description = "E-commerce backend: users, categories, products and transactions",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        user_handler::register,
        user_handler::login,
        user_handler::top_up,
        category_handler::create_category,
        category_handler::get_categories,
        category_handler::update_category,
        category_handler::delete_category,
        product_handler::create_product,
        product_handler::get_products,
        product_handler::update_product,
        product_handler::delete_product,
        transaction_handler::create_transaction,
        transaction_handler::get_my_transactions,
        transaction_handler::get_user_transactions,
    ),
    components(
        schemas(
            UserResponse,
            TokenResponse,
            MessageResponse,
            user_handler::RegisterRequest,
            user_handler::LoginRequest,
            user_handler::TopUpRequest,
            category_handler::CategoryRequest,
            category_handler::CreatedCategoryResponse,
            category_handler::UpdatedCategoryResponse,
            category_handler::CategoryProductResponse,
            category_handler::CategoryResponse,
            product_handler::ProductRequest,
            product_handler::ProductResponse,
            product_handler::UpdatedProduct,
            product_handler::UpdatedProductResponse,
            transaction_handler::TransactionRequest,
            transaction_handler::TransactionBillResponse,
            transaction_handler::CheckoutResponse,
            transaction_handler::TransactionProduct,
            transaction_handler::TransactionBuyer,
            transaction_handler::TransactionResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and balance top-up"),
        (name = "Categories", description = "Product categories (admin managed)"),
        (name = "Products", description = "Product catalogue (admin managed)"),
        (name = "Transactions", description = "Checkout and purchase history")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /users/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/users/register",
            "/users/login",
            "/users/topup",
            "/categories",
            "/categories/{categoryId}",
            "/products",
            "/products/{productId}",
            "/transactions",
            "/transactions/my-transactions",
            "/transactions/user-transactions",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
