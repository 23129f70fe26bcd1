use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use shared_models::error::AppError;

/// Numeric surrogate id taken from the `{id}` path segment.
/// Anything that is not an integer is rejected with 400 before reaching a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityId(pub i64);

impl<S> FromRequestParts<S> for EntityId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("invalid id provided".to_string()))?;

        raw.trim()
            .parse::<i64>()
            .map(EntityId)
            .map_err(|_| AppError::BadRequest("invalid id provided".to_string()))
    }
}
