//! Flash message storage
//!
//! Flash messages are short text notices written during one request and
//! consumed by the next request that reads them. They live in an optional
//! slot on the session; this module never keeps its own copy.
//!
//! - [`Flash`] - per-request accessor (drain all, drain one key, append)
//! - [`FlashView`] - per-request memoized snapshot for rendering
//! - [`FlashSession`] - what a session handle must provide to hold flashes

mod store;
mod view;

pub use store::Flash;
pub use view::FlashView;

use std::collections::BTreeMap;

/// A single flash message
pub type FlashValue = String;

/// Flash messages grouped by key, in the order they were added
pub type FlashDictionary = BTreeMap<String, Vec<FlashValue>>;

/// Capability contract for session handles that can hold flash messages
///
/// Implementors give scoped mutable access to the session's reserved flash
/// slot. `None` is the canonical representation of "no flashes"; the
/// accessor keeps the slot at `None` instead of storing an empty dictionary.
///
/// The handle is cloned into request extensions, so clones must refer to
/// the same underlying session state.
pub trait FlashSession: Clone + Send + Sync + 'static {
    /// Run `f` with mutable access to the flash slot
    fn with_flash_slot<R>(&self, f: impl FnOnce(&mut Option<FlashDictionary>) -> R) -> R;
}

/// Messages passed to [`Flash::append`]: one message or an ordered sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashInput {
    /// A single message
    One(FlashValue),
    /// Several messages, appended in order
    Many(Vec<FlashValue>),
}

impl FlashInput {
    /// Flatten into the ordered list of messages
    #[must_use]
    pub fn into_values(self) -> Vec<FlashValue> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl From<&str> for FlashInput {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for FlashInput {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for FlashInput {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for FlashInput {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for FlashInput {
    fn from(values: [&str; N]) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Result of the single-entry [`Flash::call`] dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashOutcome {
    /// Every key was drained
    All(FlashDictionary),
    /// One key was drained
    Key(Vec<FlashValue>),
    /// Messages were appended
    Appended,
}
