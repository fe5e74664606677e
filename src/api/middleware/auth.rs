//! Authentication and authorization interceptors.
//!
//! Each check is a plain function that either lets the request continue
//! (`Ok`) or short-circuits it with an [`AppError`]. The axum middleware at
//! the bottom of this file only gathers inputs and calls them.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::api::extractors::ResourceId;
use crate::api::AppState;
use crate::domain::UserRole;
use crate::errors::{AppError, AppResult};
use crate::services::AuthService;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Resolve the caller from a bearer token. No token means 401.
pub fn authenticate(token: Option<&str>, auth: &dyn AuthService) -> AppResult<CurrentUser> {
    let token = token.ok_or(AppError::Unauthorized)?;
    let claims = auth.verify_token(token)?;

    Ok(CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: UserRole::from(claims.role.as_str()),
    })
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require the caller to be the recorded owner of a resource.
pub fn require_owner(user: &CurrentUser, owner_id: Uuid) -> AppResult<()> {
    if user.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn current_user(request: &Request) -> AppResult<&CurrentUser> {
    request
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)
}

/// JWT authentication middleware.
///
/// Validates the bearer token and injects the CurrentUser into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = bearer.as_ref().map(|TypedHeader(auth)| auth.token());
    let user = authenticate(token, state.auth_service.as_ref())?;

    tracing::debug!(user_id = %user.id, role = %user.role, "Request authenticated");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Admin-only gate. Must run inside `auth_middleware`.
pub async fn admin_middleware(request: Request, next: Next) -> AppResult<Response> {
    require_admin(current_user(&request)?)?;
    Ok(next.run(request).await)
}

/// Lets the request through only if the caller created `:categoryId`.
pub async fn category_owner_middleware(
    State(state): State<AppState>,
    ResourceId(category_id): ResourceId,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let user = current_user(&request)?.clone();
    let category = state.category_service.get_category(category_id).await?;
    require_owner(&user, category.user_id)?;

    Ok(next.run(request).await)
}

/// Lets the request through only if the caller created `:productId`.
pub async fn product_owner_middleware(
    State(state): State<AppState>,
    ResourceId(product_id): ResourceId,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let user = current_user(&request)?.clone();
    let product = state.product_service.get_product(product_id).await?;
    require_owner(&user, product.user_id)?;

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::services::{Claims, Registration, TokenResponse};
    use async_trait::async_trait;

    struct StaticTokens;

    #[async_trait]
    impl AuthService for StaticTokens {
        async fn register(&self, _: Registration, _: UserRole) -> AppResult<User> {
            Err(AppError::internal("unused"))
        }

        async fn login(&self, _: String, _: String) -> AppResult<TokenResponse> {
            Err(AppError::internal("unused"))
        }

        fn verify_token(&self, token: &str) -> AppResult<Claims> {
            match token {
                "admin-token" => Ok(Claims {
                    sub: Uuid::nil(),
                    email: "admin@tokobelanja.com".to_string(),
                    role: "admin".to_string(),
                    exp: 0,
                    iat: 0,
                }),
                _ => Err(AppError::Unauthorized),
            }
        }
    }

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_authenticate_requires_token() {
        let result = authenticate(None, &StaticTokens);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_authenticate_rejects_bad_token() {
        let result = authenticate(Some("garbage"), &StaticTokens);
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_authenticate_builds_current_user() {
        let current = authenticate(Some("admin-token"), &StaticTokens).unwrap();
        assert_eq!(current.id, Uuid::nil());
        assert!(current.is_admin());
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user(UserRole::Admin)).is_ok());
        assert!(matches!(
            require_admin(&user(UserRole::Customer)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_require_owner() {
        let admin = user(UserRole::Admin);
        assert!(require_owner(&admin, admin.id).is_ok());
        assert!(matches!(
            require_owner(&admin, Uuid::new_v4()),
            Err(AppError::Forbidden)
        ));
    }
}
