//! Session middleware for automatic session management
//!
//! Provides middleware that handles session cookie extraction, loading from
//! a [`SessionStore`], and persistence after the handler runs.

use crate::config::SessionConfig;
use crate::session::{Session, SessionData, SessionId, SessionStore};
use axum::{
    body::Body,
    extract::Request,
    http::header::{COOKIE, SET_COOKIE},
    response::Response,
};
use std::str::FromStr;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Layer for session middleware
#[derive(Clone)]
pub struct SessionLayer {
    config: Arc<SessionConfig>,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for SessionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLayer")
            .field("config", &self.config)
            .field("store", &"dyn SessionStore")
            .finish()
    }
}

impl SessionLayer {
    /// Create new session layer with default configuration
    #[must_use]
    pub fn new(store: impl SessionStore) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    /// Create session layer with custom configuration
    #[must_use]
    pub fn with_config(store: impl SessionStore, config: SessionConfig) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}

impl<S> Layer<S> for SessionLayer {
    type Service = SessionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionMiddleware {
            inner,
            config: self.config.clone(),
            store: self.store.clone(),
        }
    }
}

/// Session middleware that handles cookie-based sessions
///
/// Inserts a [`Session`] handle into the request extensions. After the
/// inner service responds, the session is saved and the cookie is sent
/// again, so its `Max-Age` follows the server-side expiry refreshed on each
/// request. A new session that is still empty is neither saved nor given a
/// cookie.
#[derive(Clone)]
pub struct SessionMiddleware<S> {
    inner: S,
    config: Arc<SessionConfig>,
    store: Arc<dyn SessionStore>,
}

impl<S: std::fmt::Debug> std::fmt::Debug for SessionMiddleware<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionMiddleware")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .field("store", &"dyn SessionStore")
            .finish()
    }
}

impl<S> Service<Request> for SessionMiddleware<S>
where
    S: Service<Request, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let config = self.config.clone();
        let store = self.store.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let existing_session_id = extract_session_id(&req, &config.cookie_name);

            // Load or create session
            let loaded = match existing_session_id {
                Some(id) => match store.load(&id).await {
                    Ok(data) => data.map(|data| (id, data)),
                    Err(err) => {
                        tracing::warn!(error = %err, "Failed to load session, starting a new one");
                        None
                    }
                },
                None => None,
            };

            let (session, is_new) = match loaded {
                Some((id, mut data)) => {
                    data.touch(config.ttl());
                    (Session::new(id, data), false)
                }
                None => (
                    Session::new(SessionId::generate(), SessionData::with_ttl(config.ttl())),
                    true,
                ),
            };

            // Insert session into request extensions for handlers to access
            req.extensions_mut().insert(session.clone());

            let mut response = inner.call(req).await?;

            let data = session.data();
            if is_new && data.is_empty() {
                return Ok(response);
            }

            if let Err(err) = store.save(session.id(), &data).await {
                tracing::error!(error = %err, session_id = %session.id(), "Failed to save session");
            }

            set_session_cookie(&mut response, session.id(), &config);

            Ok(response)
        })
    }
}

/// Extract session ID from request cookies
fn extract_session_id(req: &Request, cookie_name: &str) -> Option<SessionId> {
    let cookie_header = req.headers().get(COOKIE)?;
    let cookie_str = cookie_header.to_str().ok()?;

    // Parse cookies looking for our session cookie
    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            if name.trim() == cookie_name {
                return SessionId::from_str(value.trim()).ok();
            }
        }
    }

    None
}

/// Set session cookie on response
fn set_session_cookie(
    response: &mut Response<Body>,
    session_id: &SessionId,
    config: &SessionConfig,
) {
    let mut cookie_value = format!(
        "{}={}; Path={}; Max-Age={}; SameSite={}",
        config.cookie_name,
        session_id.as_str(),
        config.cookie_path,
        config.max_age_secs,
        config.same_site.as_str()
    );

    if config.http_only {
        cookie_value.push_str("; HttpOnly");
    }

    if config.secure {
        cookie_value.push_str("; Secure");
    }

    if let Ok(header_value) = cookie_value.parse() {
        response.headers_mut().append(SET_COOKIE, header_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SESSION_COOKIE_NAME;
    use crate::session::MemoryStore;
    use std::convert::Infallible;
    use tower::{service_fn, ServiceExt};

    fn request_with_cookie(cookie: &str) -> Request {
        Request::builder()
            .header(COOKIE, cookie)
            .body(Body::empty())
            .expect("valid request")
    }

    #[test]
    fn test_extract_session_id() {
        let id = SessionId::generate();
        let req = request_with_cookie(&format!("theme=dark; {SESSION_COOKIE_NAME}={id}"));

        assert_eq!(extract_session_id(&req, SESSION_COOKIE_NAME), Some(id));
    }

    #[test]
    fn test_extract_session_id_ignores_invalid() {
        let req = request_with_cookie(&format!("{SESSION_COOKIE_NAME}=garbage"));
        assert!(extract_session_id(&req, SESSION_COOKIE_NAME).is_none());
    }

    #[test]
    fn test_set_session_cookie_attributes() {
        let config = SessionConfig {
            secure: true,
            ..SessionConfig::default()
        };
        let id = SessionId::generate();
        let mut response = Response::new(Body::empty());

        set_session_cookie(&mut response, &id, &config);

        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .expect("cookie set");
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}={id}")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
    }

    #[tokio::test]
    async fn test_empty_new_session_not_persisted() {
        let store = MemoryStore::new();
        let service = SessionLayer::new(store.clone()).layer(service_fn(|_req: Request| async {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        }));

        let response = service
            .oneshot(Request::new(Body::empty()))
            .await
            .expect("infallible");

        assert!(response.headers().get(SET_COOKIE).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_modified_new_session_persisted() {
        let store = MemoryStore::new();
        let service = SessionLayer::new(store.clone()).layer(service_fn(|req: Request| async move {
            let session = req.extensions().get::<Session>().cloned().expect("session");
            session.set("visited", true).expect("serializable");
            Ok::<_, Infallible>(Response::new(Body::empty()))
        }));

        let response = service
            .oneshot(Request::new(Body::empty()))
            .await
            .expect("infallible");

        assert!(response.headers().get(SET_COOKIE).is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_existing_session_loaded() {
        let store = MemoryStore::new();
        let id = SessionId::generate();
        let mut data = SessionData::new();
        data.set("name", "ada").expect("serializable");
        store.save(&id, &data).await.expect("save");

        let service = SessionLayer::new(store.clone()).layer(service_fn(|req: Request| async move {
            let session = req.extensions().get::<Session>().cloned().expect("session");
            let name: Option<String> = session.get("name");
            Ok::<_, Infallible>(Response::new(Body::from(name.unwrap_or_default())))
        }));

        let response = service
            .oneshot(request_with_cookie(&format!("{SESSION_COOKIE_NAME}={id}")))
            .await
            .expect("infallible");

        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .expect("cookie refreshed");
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}={id}")));
        assert!(cookie.contains("Max-Age=86400"));

        let stored = store.load(&id).await.expect("load").expect("present");
        assert!(stored.expires_at > data.expires_at);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        assert_eq!(&body[..], b"ada");
    }
}
