//! Flash middleware
//!
//! Installs the per-request [`Flash`] accessor and [`FlashView`] memo into
//! the request extensions. Must run after the session layer, so in axum it
//! is added with `.layer()` *before* the session layer:
//!
//! ```rust,ignore
//! use acton_flash::{flash, MemoryStore, SessionLayer};
//!
//! let app = Router::new()
//!     .route("/", get(index))
//!     .layer(flash())
//!     .layer(SessionLayer::new(MemoryStore::new()));
//! ```

use crate::flash::{Flash, FlashSession, FlashView};
use crate::session::Session;
use http::{Extensions, Request};
use std::fmt;
use std::marker::PhantomData;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Create the flash layer for the built-in [`Session`]
///
/// Takes no configuration. Applying the layer more than once is harmless:
/// the first installation wins and later ones do nothing.
#[must_use]
pub const fn flash() -> FlashLayer {
    FlashLayer::new()
}

/// Layer that installs flash support, generic over the session handle type
pub struct FlashLayer<S = Session> {
    _session: PhantomData<fn() -> S>,
}

impl<S> FlashLayer<S> {
    /// Create a flash layer reading `S` from the request extensions
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _session: PhantomData,
        }
    }
}

impl<S> Default for FlashLayer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Clone for FlashLayer<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for FlashLayer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashLayer").finish()
    }
}

impl<I, S> Layer<I> for FlashLayer<S> {
    type Service = FlashMiddleware<I, S>;

    fn layer(&self, inner: I) -> Self::Service {
        FlashMiddleware {
            inner,
            _session: PhantomData,
        }
    }
}

/// Middleware that installs [`Flash`] and [`FlashView`] for each request
pub struct FlashMiddleware<I, S = Session> {
    inner: I,
    _session: PhantomData<fn() -> S>,
}

impl<I: Clone, S> Clone for FlashMiddleware<I, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _session: PhantomData,
        }
    }
}

impl<I: fmt::Debug, S> fmt::Debug for FlashMiddleware<I, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashMiddleware")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<I, S, B> Service<Request<B>> for FlashMiddleware<I, S>
where
    I: Service<Request<B>>,
    S: FlashSession,
{
    type Response = I::Response;
    type Error = I::Error;
    type Future = I::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        install::<S>(req.extensions_mut());
        self.inner.call(req)
    }
}

/// Install the accessor and view unless already present
fn install<S: FlashSession>(extensions: &mut Extensions) {
    if extensions.get::<Flash<S>>().is_some() {
        tracing::debug!("Flash accessor already installed");
        return;
    }

    let Some(session) = extensions.get::<S>().cloned() else {
        tracing::warn!("No session found on request; flash layer must run after the session layer");
        return;
    };

    let flash = Flash::new(session);
    extensions.insert(FlashView::new(flash.clone()));
    extensions.insert(flash);
}
