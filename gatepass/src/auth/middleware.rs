//! Request extractors for staff authentication.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum::extract::FromRef;

use crate::directory::StaffToken;
use crate::error::AppError;
use crate::server::AppState;
use crate::types::Staff;

/// Extracts the raw bearer token from the `Authorization` header.
#[derive(Clone, Debug)]
pub struct BearerToken(pub StaffToken);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("expected Bearer token"))?;

        if token.is_empty() {
            return Err(AppError::unauthorized("empty bearer token"));
        }

        Ok(Self(StaffToken::new(token.to_string())))
    }
}

/// Extracts the authenticated staff actor for the request.
///
/// Resolves the bearer token against the staff directory; rejects with
/// 401 when the token is absent or unknown.
#[derive(Clone, Debug)]
pub struct SessionStaff(pub Staff);

#[async_trait]
impl<S> FromRequestParts<S> for SessionStaff
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let staff = app_state
            .staff
            .resolve_token(&token)
            .await
            .ok_or_else(|| AppError::unauthorized("unknown bearer token"))?;

        Ok(Self(staff))
    }
}
