//! Category handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{not_blank, ResourceId, ValidatedJson};
use crate::api::middleware::{admin_middleware, category_owner_middleware, CurrentUser};
use crate::api::AppState;
use crate::config::CATEGORY_DELETED_MESSAGE;
use crate::domain::{Category, CategoryWithProducts, Product};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

/// Create or rename a category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank", message = "Type is required"))]
    #[schema(example = "Elektronik")]
    pub category_type: String,
}

/// Returned after creating a category
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedCategoryResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub category_type: String,
    pub sold_product_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CreatedCategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            category_type: category.category_type,
            sold_product_amount: category.sold_product_amount,
            created_at: category.created_at,
        }
    }
}

/// Returned after renaming a category
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdatedCategoryResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub category_type: String,
    pub sold_product_amount: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for UpdatedCategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            category_type: category.category_type,
            sold_product_amount: category.sold_product_amount,
            updated_at: category.updated_at,
        }
    }
}

/// Product as listed inside its category
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryProductResponse {
    pub id: Uuid,
    pub title: String,
    pub price: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for CategoryProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            stock: product.stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Category listing entry
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub category_type: String,
    pub sold_product_amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub products: Vec<CategoryProductResponse>,
}

impl From<CategoryWithProducts> for CategoryResponse {
    fn from(entry: CategoryWithProducts) -> Self {
        let CategoryWithProducts { category, products } = entry;
        Self {
            id: category.id,
            category_type: category.category_type,
            sold_product_amount: category.sold_product_amount,
            created_at: category.created_at,
            updated_at: category.updated_at,
            products: products.into_iter().map(Into::into).collect(),
        }
    }
}

/// Create category routes. Every route sits behind authentication, applied
/// by the caller; writes additionally need an admin, and changes to an
/// existing category need its owner.
pub fn category_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_categories)
                .merge(post(create_category).route_layer(middleware::from_fn(admin_middleware))),
        )
        .route(
            "/:categoryId",
            patch(update_category)
                .delete(delete_category)
                .route_layer(middleware::from_fn_with_state(
                    state,
                    category_owner_middleware,
                ))
                .route_layer(middleware::from_fn(admin_middleware)),
        )
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CategoryRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Category created", body = CreatedCategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only"),
        (status = 422, description = "Invalid JSON body")
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Created<CreatedCategoryResponse>> {
    let category = state
        .category_service
        .create_category(current_user.id, payload.category_type)
        .await?;

    Ok(Created(category.into()))
}

/// List categories with their products
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All categories", body = Vec<CategoryResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryResponse>>> {
    let categories = state.category_service.get_all_categories().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Rename a category
#[utoipa::path(
    patch,
    path = "/categories/{categoryId}",
    tag = "Categories",
    request_body = CategoryRequest,
    params(("categoryId" = Uuid, Path, description = "Category ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category updated", body = UpdatedCategoryResponse),
        (status = 400, description = "Validation error or malformed id"),
        (status = 403, description = "Not the category owner"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Invalid JSON body")
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<UpdatedCategoryResponse>> {
    let category = state
        .category_service
        .update_category(id, payload.category_type)
        .await?;

    Ok(Json(category.into()))
}

/// Delete an empty category
#[utoipa::path(
    delete,
    path = "/categories/{categoryId}",
    tag = "Categories",
    params(("categoryId" = Uuid, Path, description = "Category ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Category deleted", body = MessageResponse),
        (status = 403, description = "Not the category owner"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has products")
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<MessageResponse>> {
    state.category_service.delete_category(id).await?;
    Ok(Json(MessageResponse::new(CATEGORY_DELETED_MESSAGE)))
}
