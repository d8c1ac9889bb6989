//! Flash extractors
//!
//! All of these require [`FlashLayer`](crate::middleware::FlashLayer) to be
//! applied to the router, after the session layer.

use crate::flash::{Flash, FlashDictionary, FlashSession, FlashView};
use crate::session::Session;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

const NOT_INSTALLED: (StatusCode, &str) = (
    StatusCode::INTERNAL_SERVER_ERROR,
    "Flash middleware not installed",
);

impl<St, S> FromRequestParts<St> for Flash<S>
where
    St: Send + Sync,
    S: FlashSession,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or(NOT_INSTALLED)
    }
}

impl<St, S> FromRequestParts<St> for FlashView<S>
where
    St: Send + Sync,
    S: FlashSession,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or(NOT_INSTALLED)
    }
}

/// Extractor for the flash messages of this response
///
/// Reads the request's [`FlashView`], so the session is drained only on the
/// first read and every later read in the same request gets the same
/// snapshot.
///
/// # Example
///
/// ```rust,ignore
/// use acton_flash::extractors::Flashes;
///
/// async fn handler(Flashes(flashes): Flashes) {
///     for (key, messages) in &flashes {
///         for message in messages {
///             println!("{key}: {message}");
///         }
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flashes(pub FlashDictionary);

impl<St> FromRequestParts<St> for Flashes
where
    St: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &St) -> Result<Self, Self::Rejection> {
        let view = FlashView::<Session>::from_request_parts(parts, state).await?;
        Ok(Self(view.flashes().clone()))
    }
}
