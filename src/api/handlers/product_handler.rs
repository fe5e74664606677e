//! Product handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{not_blank, ResourceId, ValidatedJson};
use crate::api::middleware::{admin_middleware, product_owner_middleware, CurrentUser};
use crate::api::AppState;
use crate::config::PRODUCT_DELETED_MESSAGE;
use crate::domain::{Product, ProductInput};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

/// Create or replace a product
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    #[schema(example = "Sepatu Lari")]
    pub title: String,
    /// Price in Rupiah
    #[validate(range(min = 0, max = 50_000_000, message = "Price must be between 0 and 50000000"))]
    #[schema(example = 250000)]
    pub price: i64,
    #[validate(range(min = 5, message = "Stock must be at least 5"))]
    #[schema(example = 10)]
    pub stock: i64,
    pub category_id: Uuid,
}

impl From<ProductRequest> for ProductInput {
    fn from(request: ProductRequest) -> Self {
        Self {
            title: request.title,
            price: request.price,
            stock: request.stock,
            category_id: request.category_id,
        }
    }
}

/// Product as returned by create and list
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub price: i64,
    pub stock: i64,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            stock: product.stock,
            category_id: product.category_id,
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedProduct {
    pub id: Uuid,
    pub title: String,
    pub price: i64,
    pub stock: i64,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returned after replacing a product
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedProductResponse {
    pub product: UpdatedProduct,
}

impl From<Product> for UpdatedProductResponse {
    fn from(product: Product) -> Self {
        Self {
            product: UpdatedProduct {
                id: product.id,
                title: product.title,
                price: product.price,
                stock: product.stock,
                category_id: product.category_id,
                created_at: product.created_at,
                updated_at: product.updated_at,
            },
        }
    }
}

/// Create product routes (authentication applied by the caller).
pub fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_products)
                .merge(post(create_product).route_layer(middleware::from_fn(admin_middleware))),
        )
        .route(
            "/:productId",
            put(update_product)
                .delete(delete_product)
                .route_layer(middleware::from_fn_with_state(state, product_owner_middleware))
                .route_layer(middleware::from_fn(admin_middleware)),
        )
}

/// List a new product
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Invalid JSON body")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Created<ProductResponse>> {
    let product = state
        .product_service
        .create_product(current_user.id, payload.into())
        .await?;

    Ok(Created(product.into()))
}

/// List every product
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All products", body = Vec<ProductResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_products(State(state): State<AppState>) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.product_service.get_all_products().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Replace a product's fields
#[utoipa::path(
    put,
    path = "/products/{productId}",
    tag = "Products",
    request_body = ProductRequest,
    params(("productId" = Uuid, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = UpdatedProductResponse),
        (status = 400, description = "Validation error or malformed id"),
        (status = 403, description = "Not the product owner"),
        (status = 404, description = "Product or category not found"),
        (status = 422, description = "Invalid JSON body")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<UpdatedProductResponse>> {
    let product = state
        .product_service
        .update_product(id, payload.into())
        .await?;

    Ok(Json(product.into()))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{productId}",
    tag = "Products",
    params(("productId" = Uuid, Path, description = "Product ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 403, description = "Not the product owner"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<MessageResponse>> {
    state.product_service.delete_product(id).await?;
    Ok(Json(MessageResponse::new(PRODUCT_DELETED_MESSAGE)))
}
