//! Request Authentication
//!
//! The fronting auth proxy resolves the session and forwards the user id in
//! the `x-user-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::utils::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated user making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(|user_id| AuthUser { user_id })
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<AuthUser, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_valid_user_header() {
        assert_eq!(extract(Some("42")).await.unwrap().user_id, 42);
    }

    #[tokio::test]
    async fn test_missing_or_invalid_header() {
        assert!(matches!(extract(None).await, Err(AppError::Unauthorized)));
        assert!(matches!(extract(Some("abc")).await, Err(AppError::Unauthorized)));
        assert!(matches!(extract(Some("0")).await, Err(AppError::Unauthorized)));
    }
}
