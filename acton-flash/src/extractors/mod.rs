//! Axum extractors for acton-flash
//!
//! Provides extractors for the session handle, the flash accessor, and the
//! memoized flash view within handlers.

mod flash;
mod session;

pub use flash::Flashes;
