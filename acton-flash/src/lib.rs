//! One-shot flash messages for axum applications
//!
//! A handler stores short text messages under a key during one request; the
//! next request that reads the key receives them exactly once, after which
//! they are removed from the session.
//!
//! # Components
//!
//! - [`Flash`] - per-request accessor with three operations:
//!   [`drain_all`](Flash::drain_all), [`drain_key`](Flash::drain_key) and
//!   [`append`](Flash::append)
//! - [`FlashView`] - per-request memo of `drain_all`, so rendering code can
//!   read the response's flashes many times and see one snapshot
//! - [`flash()`] - zero-configuration layer installing both into each request
//! - [`SessionLayer`] - cookie session layer hosting the flash slot
//!
//! # Example
//!
//! ```rust,no_run
//! use acton_flash::{extractors::Flashes, flash, Flash, MemoryStore, SessionLayer};
//! use axum::{response::Redirect, routing::{get, post}, Router};
//!
//! async fn save(flash: Flash) -> Redirect {
//!     flash.append("success", "Settings saved");
//!     Redirect::to("/")
//! }
//!
//! async fn index(Flashes(flashes): Flashes) -> String {
//!     flashes
//!         .get("success")
//!         .map(|messages| messages.join(", "))
//!         .unwrap_or_default()
//! }
//!
//! let app: Router = Router::new()
//!     .route("/", get(index))
//!     .route("/save", post(save))
//!     .layer(flash())
//!     .layer(SessionLayer::new(MemoryStore::new()));
//! ```
//!
//! # Custom sessions
//!
//! Any session handle implementing [`FlashSession`] can host flashes; use
//! `FlashLayer::<MySession>::new()` and extract `Flash<MySession>`.

pub mod config;
pub mod extractors;
pub mod flash;
pub mod middleware;
pub mod session;

pub use config::{ConfigError, SameSite, SessionConfig, SESSION_COOKIE_NAME};
pub use flash::{
    Flash, FlashDictionary, FlashInput, FlashOutcome, FlashSession, FlashValue, FlashView,
};
pub use middleware::flash::flash;
pub use middleware::{FlashLayer, FlashMiddleware, SessionLayer, SessionMiddleware};
pub use session::{MemoryStore, Session, SessionData, SessionError, SessionId, SessionStore};
