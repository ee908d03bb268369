//! Caller identity extraction.
//!
//! The upstream authentication layer forwards the authenticated user as
//! headers. Requests without a usable identity are rejected with 401.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use courier_core::identity::Caller;

use crate::error::ApiError;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor yielding the authenticated [`Caller`].
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedCaller(pub Caller);

impl<S> FromRequestParts<S> for AuthenticatedCaller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let headers = &parts.headers;
        let user_id = headers.get(USER_ID_HEADER).and_then(|v| v.to_str().ok());
        let role = headers
            .get(USER_ROLE_HEADER)
            .and_then(|v| v.to_str().ok());
        Caller::from_raw(user_id, role)
            .map(Self)
            .map_err(ApiError::from)
    }
}
