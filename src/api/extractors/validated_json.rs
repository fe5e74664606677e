//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::config::INVALID_JSON_BODY;
use crate::errors::AppError;

/// JSON body that has been deserialized and passed its `validator` rules.
///
/// A body that cannot be parsed (bad syntax, wrong types, missing
/// `Content-Type`) is rejected with 422 "Invalid JSON body"; a parsed body
/// that breaks a rule is rejected with 400 and the rule messages.
///
/// ```rust,ignore
/// #[derive(Deserialize, Validate)]
/// struct TopUpRequest {
///     #[validate(range(min = 1))]
///     balance: i64,
/// }
///
/// async fn top_up(ValidatedJson(payload): ValidatedJson<TopUpRequest>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(reason = %e.body_text(), "Rejected request body");
            AppError::unprocessable(INVALID_JSON_BODY)
        })?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// `validator` rule for text fields that must contain more than whitespace.
///
/// ```rust,ignore
/// #[validate(custom(function = "not_blank", message = "Title is required"))]
/// title: String,
/// ```
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Format validation errors into a user-friendly string, ordered by field
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Elektronik").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank(" \t ").is_err());
    }

    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: i64,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ValidatedJson(payload) =
            ValidatedJson::<Payload>::from_request(json_request(r#"{"name":"a","quantity":2}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.name, "a");
        assert_eq!(payload.quantity, 2);
    }

    #[tokio::test]
    async fn test_malformed_body_is_unprocessable() {
        let err = ValidatedJson::<Payload>::from_request(json_request("{not json"), &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), INVALID_JSON_BODY);
    }

    #[tokio::test]
    async fn test_wrong_type_is_unprocessable() {
        let err = ValidatedJson::<Payload>::from_request(
            json_request(r#"{"name":"a","quantity":"two"}"#),
            &(),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_rule_violation_is_bad_request() {
        let err = ValidatedJson::<Payload>::from_request(
            json_request(r#"{"name":"","quantity":0}"#),
            &(),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Name is required, Quantity must be at least 1"
        );
    }
}
