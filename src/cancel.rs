//! Cooperative cancellation for store operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheap, clonable cancellation handle.
///
/// Store operations accept a `CancelToken` and check it once their network
/// call has settled: a cancelled token suppresses the operation's state
/// mutation, while the call itself is always allowed to complete naturally.
/// Cancelling a token is a one-way switch shared by all of its clones.
///
/// # Example
/// ```rust,ignore
/// use reqres_rs::CancelToken;
///
/// let token = CancelToken::new();
/// let load = collection.load_with(2, &token);
///
/// // The owning screen went away before the response arrived.
/// token.cancel();
///
/// // The page fetch completes, but the store is left untouched.
/// assert!(load.await.is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a fresh, non-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the token to its cancelled state.
    ///
    /// Affects every clone of this token. Irreversible.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any
    /// clone of this token.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
