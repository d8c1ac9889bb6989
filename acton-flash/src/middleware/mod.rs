//! Middleware layers for acton-flash
//!
//! Provides middleware for:
//! - Session management (cookie-based sessions)
//! - Flash message installation

pub mod flash;
pub mod session;

pub use flash::{flash, FlashLayer, FlashMiddleware};
pub use session::{SessionLayer, SessionMiddleware};
