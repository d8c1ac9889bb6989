//! Session extractor

use crate::session::Session;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

/// Extracts the current [`Session`] handle
///
/// Requires [`SessionLayer`](crate::middleware::SessionLayer) to be applied
/// to the router.
impl<St> FromRequestParts<St> for Session
where
    St: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "Session not initialized"))
    }
}
