//! Per-request flash accessor
//!
//! Reads here are destructive: draining a key (or everything) returns the
//! messages and removes them from the session in the same step.

use super::{FlashDictionary, FlashInput, FlashOutcome, FlashSession, FlashValue};
use crate::session::Session;

/// Flash accessor bound to one request's session
///
/// Installed into request extensions by [`FlashLayer`](crate::middleware::FlashLayer)
/// and extracted in handlers.
///
/// # Example
///
/// ```rust,ignore
/// use acton_flash::Flash;
/// use axum::response::Redirect;
///
/// async fn create_post(flash: Flash) -> Redirect {
///     flash.append("success", "Post created");
///     Redirect::to("/posts")
/// }
///
/// async fn list_posts(flash: Flash) -> String {
///     flash.drain_key("success").join("\n")
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Flash<S = Session> {
    session: S,
}

impl<S: FlashSession> Flash<S> {
    /// Bind an accessor to a session handle
    #[must_use]
    pub const fn new(session: S) -> Self {
        Self { session }
    }

    /// The session handle this accessor writes to
    #[must_use]
    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Take every flash message and remove the slot from the session
    ///
    /// Returns an empty dictionary when no flashes are stored.
    #[must_use]
    pub fn drain_all(&self) -> FlashDictionary {
        let flashes = self
            .session
            .with_flash_slot(Option::take)
            .unwrap_or_default();

        tracing::debug!(keys = flashes.len(), "Drained all flash messages");
        flashes
    }

    /// Take the messages stored under `key` and remove the key
    ///
    /// Other keys are left untouched. Returns an empty list when the key
    /// holds nothing.
    #[must_use]
    pub fn drain_key(&self, key: &str) -> Vec<FlashValue> {
        let values = self.session.with_flash_slot(|slot| {
            let Some(flashes) = slot.as_mut() else {
                return Vec::new();
            };

            let values = flashes.remove(key).unwrap_or_default();
            if flashes.is_empty() {
                *slot = None;
            }
            values
        });

        tracing::debug!(key, count = values.len(), "Drained flash messages");
        values
    }

    /// Append one or more messages to `key`
    ///
    /// Existing messages keep their position; new ones follow in the order
    /// given. Duplicates are kept. Appending an empty sequence stores
    /// nothing, not even an empty entry for `key`.
    pub fn append(&self, key: impl Into<String>, values: impl Into<FlashInput>) {
        let values = values.into().into_values();
        if values.is_empty() {
            return;
        }

        let key = key.into();
        tracing::debug!(key = %key, count = values.len(), "Appending flash messages");

        self.session.with_flash_slot(|slot| {
            slot.get_or_insert_with(FlashDictionary::new)
                .entry(key)
                .or_default()
                .extend(values);
        });
    }

    /// Append a single message to `key`
    pub fn push(&self, key: impl Into<String>, value: impl Into<FlashValue>) {
        self.append(key, FlashInput::One(value.into()));
    }

    /// Copy the messages under `key` without consuming them
    #[must_use]
    pub fn peek_key(&self, key: &str) -> Vec<FlashValue> {
        self.session.with_flash_slot(|slot| {
            slot.as_ref()
                .and_then(|flashes| flashes.get(key))
                .cloned()
                .unwrap_or_default()
        })
    }

    /// Check whether any flash messages are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.session.with_flash_slot(|slot| {
            slot.as_ref()
                .is_none_or(|flashes| flashes.values().all(Vec::is_empty))
        })
    }

    /// Single-entry dispatch over the three operations
    ///
    /// - no key: [`drain_all`](Self::drain_all)
    /// - key without value: [`drain_key`](Self::drain_key)
    /// - key and value: [`append`](Self::append)
    ///
    /// A key paired with `None` drains that key rather than appending
    /// nothing.
    #[must_use]
    pub fn call(&self, key: Option<&str>, value: Option<FlashInput>) -> FlashOutcome {
        match (key, value) {
            (Some(key), Some(value)) => {
                self.append(key, value);
                FlashOutcome::Appended
            }
            (Some(key), None) => FlashOutcome::Key(self.drain_key(key)),
            (None, _) => FlashOutcome::All(self.drain_all()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default)]
    struct TestSession(Arc<Mutex<Option<FlashDictionary>>>);

    impl TestSession {
        fn slot(&self) -> Option<FlashDictionary> {
            self.0.lock().clone()
        }
    }

    impl FlashSession for TestSession {
        fn with_flash_slot<R>(&self, f: impl FnOnce(&mut Option<FlashDictionary>) -> R) -> R {
            f(&mut self.0.lock())
        }
    }

    fn flash() -> (Flash<TestSession>, TestSession) {
        let session = TestSession::default();
        (Flash::new(session.clone()), session)
    }

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let (flash, _) = flash();
        flash.append("a", "x");
        flash.append("a", "y");
        flash.append("a", "x");

        assert_eq!(flash.drain_key("a"), vec!["x", "y", "x"]);
    }

    #[test]
    fn test_append_sequence_then_single() {
        let (flash, _) = flash();
        flash.append("a", vec!["x", "y"]);
        flash.append("a", "z");

        assert_eq!(flash.drain_key("a"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_append_creates_slot() {
        let (flash, session) = flash();
        assert!(session.slot().is_none());

        flash.push("info", "hello");

        let slot = session.slot().expect("slot created");
        assert_eq!(slot["info"], vec!["hello"]);
    }

    #[test]
    fn test_append_empty_sequence_creates_no_key() {
        let (flash, session) = flash();
        flash.append("a", Vec::<String>::new());

        assert!(session.slot().is_none());
        assert!(flash.is_empty());
        assert!(flash.drain_all().is_empty());

        flash.push("b", "kept");
        flash.append("a", Vec::<&str>::new());
        let all = flash.drain_all();
        assert!(!all.contains_key("a"));
        assert_eq!(all["b"], vec!["kept"]);
    }

    #[test]
    fn test_drain_key_twice_returns_empty() {
        let (flash, _) = flash();
        flash.push("error", "bad input");

        assert_eq!(flash.drain_key("error"), vec!["bad input"]);
        assert!(flash.drain_key("error").is_empty());
    }

    #[test]
    fn test_drain_missing_key_leaves_others() {
        let (flash, session) = flash();
        flash.push("info", "kept");

        assert!(flash.drain_key("missing").is_empty());
        assert_eq!(session.slot().expect("slot kept")["info"], vec!["kept"]);
    }

    #[test]
    fn test_drain_key_on_absent_slot() {
        let (flash, session) = flash();
        assert!(flash.drain_key("anything").is_empty());
        assert!(session.slot().is_none());
    }

    #[test]
    fn test_drain_last_key_clears_slot() {
        let (flash, session) = flash();
        flash.push("info", "one");
        flash.push("error", "two");

        let _ = flash.drain_key("info");
        assert!(session.slot().is_some());

        let _ = flash.drain_key("error");
        assert!(session.slot().is_none());
    }

    #[test]
    fn test_drain_all_removes_slot() {
        let (flash, session) = flash();
        flash.push("info", "one");
        flash.append("error", ["two", "three"]);

        let all = flash.drain_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all["info"], vec!["one"]);
        assert_eq!(all["error"], vec!["two", "three"]);
        assert!(session.slot().is_none());

        assert!(flash.drain_all().is_empty());
        assert!(flash.drain_key("info").is_empty());
    }

    #[test]
    fn test_append_after_drain_all_is_visible() {
        let (flash, _) = flash();
        flash.push("info", "old");
        let _ = flash.drain_all();

        flash.push("info", "new");
        assert_eq!(flash.drain_key("info"), vec!["new"]);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let (flash, _) = flash();
        flash.push("info", "stay");

        assert_eq!(flash.peek_key("info"), vec!["stay"]);
        assert!(!flash.is_empty());
        assert_eq!(flash.drain_key("info"), vec!["stay"]);
    }

    #[test]
    fn test_empty_strings_are_stored() {
        let (flash, _) = flash();
        flash.push("", "");

        assert_eq!(flash.drain_key(""), vec![""]);
    }

    #[test]
    fn test_call_dispatch() {
        let (flash, _) = flash();

        assert_eq!(flash.call(Some("a"), Some("x".into())), FlashOutcome::Appended);
        assert_eq!(flash.call(Some("b"), Some("y".into())), FlashOutcome::Appended);
        assert_eq!(
            flash.call(Some("a"), None),
            FlashOutcome::Key(vec!["x".to_string()])
        );

        let FlashOutcome::All(all) = flash.call(None, None) else {
            panic!("expected drain-all outcome");
        };
        assert_eq!(all.len(), 1);
        assert_eq!(all["b"], vec!["y"]);
    }

    #[test]
    fn test_call_key_without_value_drains() {
        let (flash, _) = flash();
        flash.push("a", "x");

        assert_eq!(
            flash.call(Some("a"), None),
            FlashOutcome::Key(vec!["x".to_string()])
        );
        assert!(flash.is_empty());
    }

    proptest! {
        #[test]
        fn prop_drain_key_concatenates_appends(
            batches in prop::collection::vec(prop::collection::vec(".{0,8}", 0..4), 0..6)
        ) {
            let (flash, _) = flash();
            for batch in &batches {
                flash.append("k", batch.clone());
            }

            let expected: Vec<String> = batches.concat();
            prop_assert_eq!(flash.drain_key("k"), expected);
            prop_assert!(flash.drain_key("k").is_empty());
        }

        #[test]
        fn prop_drain_all_returns_every_appended_key(
            entries in prop::collection::vec(("[a-c]", "[a-z]{1,4}"), 1..12)
        ) {
            let (flash, session) = flash();
            let mut expected = FlashDictionary::new();
            for (key, value) in &entries {
                flash.push(key.clone(), value.clone());
                expected.entry(key.clone()).or_default().push(value.clone());
            }

            prop_assert_eq!(flash.drain_all(), expected);
            prop_assert!(session.slot().is_none());
            prop_assert!(flash.drain_all().is_empty());
        }
    }
}
