//! Transaction handlers: checkout and purchase history.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{admin_middleware, CurrentUser};
use crate::api::AppState;
use crate::config::PURCHASE_SUCCESS_MESSAGE;
use crate::domain::{Product, TransactionBill, TransactionDetail, User};
use crate::errors::AppResult;
use crate::types::Created;

/// Checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TransactionRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    #[schema(example = 2)]
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionBillResponse {
    pub total_price: i64,
    pub quantity: i64,
    pub product_title: String,
}

impl From<TransactionBill> for TransactionBillResponse {
    fn from(bill: TransactionBill) -> Self {
        Self {
            total_price: bill.total_price,
            quantity: bill.quantity,
            product_title: bill.product_title,
        }
    }
}

/// Returned after a successful checkout
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    #[schema(example = "You have successfully purchased the product")]
    pub message: String,
    pub transaction_bill: TransactionBillResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionProduct {
    pub id: Uuid,
    pub title: String,
    pub price: i64,
    pub stock: i64,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for TransactionProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            stock: product.stock,
            category_id: product.category_id,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionBuyer {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for TransactionBuyer {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            balance: user.balance,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Purchase history entry. `user` is only present in the admin listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i64,
    pub total_price: i64,
    pub product: TransactionProduct,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<TransactionBuyer>,
}

impl TransactionResponse {
    fn from_detail(detail: TransactionDetail, include_buyer: bool) -> Self {
        let TransactionDetail {
            transaction,
            product,
            user,
        } = detail;

        Self {
            id: transaction.id,
            product_id: transaction.product_id,
            user_id: transaction.user_id,
            quantity: transaction.quantity,
            total_price: transaction.total_price,
            product: product.into(),
            user: include_buyer.then(|| user.into()),
        }
    }
}

/// Create transaction routes (authentication applied by the caller).
pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_transaction))
        .route("/my-transactions", get(get_my_transactions))
        .route(
            "/user-transactions",
            get(get_user_transactions).route_layer(middleware::from_fn(admin_middleware)),
        )
}

/// Buy a product with the caller's balance
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    request_body = TransactionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Purchase completed", body = CheckoutResponse),
        (status = 400, description = "Insufficient stock or balance"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Invalid JSON body")
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<TransactionRequest>,
) -> AppResult<Created<CheckoutResponse>> {
    let bill = state
        .transaction_service
        .create_transaction(current_user.id, payload.product_id, payload.quantity)
        .await?;

    Ok(Created(CheckoutResponse {
        message: PURCHASE_SUCCESS_MESSAGE.to_string(),
        transaction_bill: bill.into(),
    }))
}

/// The caller's own purchases
#[utoipa::path(
    get,
    path = "/transactions/my-transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's purchases", body = Vec<TransactionResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_my_transactions(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<TransactionResponse>>> {
    let transactions = state
        .transaction_service
        .get_my_transactions(current_user.id)
        .await?;

    Ok(Json(
        transactions
            .into_iter()
            .map(|detail| TransactionResponse::from_detail(detail, false))
            .collect(),
    ))
}

/// Every user's purchases (admin only)
#[utoipa::path(
    get,
    path = "/transactions/user-transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All purchases with buyers", body = Vec<TransactionResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn get_user_transactions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TransactionResponse>>> {
    let transactions = state.transaction_service.get_all_transactions().await?;

    Ok(Json(
        transactions
            .into_iter()
            .map(|detail| TransactionResponse::from_detail(detail, true))
            .collect(),
    ))
}
