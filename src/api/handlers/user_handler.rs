//! User handlers: registration, login and balance top-up.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{patch, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{UserResponse, UserRole};
use crate::errors::AppResult;
use crate::services::{Registration, TokenResponse};
use crate::types::{Created, MessageResponse};

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, message = "Full name is required"))]
    #[schema(example = "Budi Santoso")]
    pub full_name: String,
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "budi@example.com")]
    pub email: String,
    /// User password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "rahasia123", min_length = 6)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "budi@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "rahasia123")]
    pub password: String,
}

/// Balance top-up request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TopUpRequest {
    /// Amount to add, in Rupiah
    #[validate(range(min = 1, max = 100_000_000, message = "Balance must be between 1 and 100000000"))]
    #[schema(example = 500000)]
    pub balance: i64,
}

/// Create user routes. Only top-up requires a token.
pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route(
            "/topup",
            patch(top_up).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid JSON body")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .auth_service
        .register(
            Registration {
                full_name: payload.full_name,
                email: payload.email,
                password: payload.password,
            },
            UserRole::Customer,
        )
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Invalid JSON body")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(Json(token))
}

/// Add funds to the caller's balance
#[utoipa::path(
    patch,
    path = "/users/topup",
    tag = "Users",
    request_body = TopUpRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Balance updated", body = MessageResponse),
        (status = 400, description = "Amount out of range or balance cap exceeded"),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Invalid JSON body")
    )
)]
pub async fn top_up(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<TopUpRequest>,
) -> AppResult<Json<MessageResponse>> {
    let user = state
        .user_service
        .top_up(current_user.id, payload.balance)
        .await?;

    Ok(Json(MessageResponse::new(format!(
        "Your balance has been successfully updated to Rp {}",
        user.balance
    ))))
}
