//! Memoized flash snapshot for the response
//!
//! Rendering code may read "the flashes for this response" any number of
//! times. The first read drains the session; later reads get the same
//! snapshot instead of an empty dictionary.

use super::{Flash, FlashDictionary, FlashSession};
use crate::session::Session;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Per-request view of all flash messages, drained at most once
///
/// Clones share the memo, so every clone taken from the same request's
/// extensions observes one snapshot. A fresh view is created for each
/// request and dropped with it; there is no way to reset it.
#[derive(Debug, Clone)]
pub struct FlashView<S = Session> {
    flash: Flash<S>,
    memo: Arc<OnceCell<FlashDictionary>>,
}

impl<S: FlashSession> FlashView<S> {
    /// Create an uncomputed view over a flash accessor
    #[must_use]
    pub fn new(flash: Flash<S>) -> Self {
        Self {
            flash,
            memo: Arc::new(OnceCell::new()),
        }
    }

    /// All flash messages for this response
    ///
    /// The first call drains every key from the session; subsequent calls
    /// return the memoized dictionary without touching the session.
    #[must_use]
    pub fn flashes(&self) -> &FlashDictionary {
        self.memo.get_or_init(|| {
            tracing::debug!("Computing flash view for response");
            self.flash.drain_all()
        })
    }

    /// Whether the snapshot has been taken yet
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.memo.get().is_some()
    }
}
