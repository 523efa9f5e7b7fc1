//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the comment store, an append-only sequence behind a single
//! reader/writer lock. Guards are taken only around the in-memory push or
//! clone and are always dropped before any I/O, logging, or await on
//! something other than the lock itself.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

/// Capacity reserved up front. Not a limit; the sequence grows as needed.
pub const INITIAL_CAPACITY: usize = 100;

// =============================================================================
// COMMENT
// =============================================================================

/// A posted comment. Its only identity is its position in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub message: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

impl Comment {
    #[must_use]
    pub fn new(message: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self { message: message.into(), user_name: user_name.into() }
    }
}

// =============================================================================
// COMMENT STORE
// =============================================================================

/// Append-only, insertion-ordered comment sequence.
///
/// Cloning is cheap and every clone shares the same underlying sequence.
#[derive(Clone)]
pub struct CommentStore {
    comments: Arc<RwLock<Vec<Comment>>>,
}

impl CommentStore {
    #[must_use]
    pub fn new() -> Self {
        Self { comments: Arc::new(RwLock::new(Vec::with_capacity(INITIAL_CAPACITY))) }
    }

    /// Push `comment` onto the end of the sequence under the write lock.
    /// Returns the length after the push.
    pub async fn append(&self, comment: Comment) -> usize {
        let mut comments = self.comments.write().await;
        comments.push(comment);
        comments.len()
    }

    /// Copy of the current sequence in insertion order, taken under the read
    /// lock. The copy may be stale as soon as the guard drops.
    pub async fn snapshot(&self) -> Vec<Comment> {
        self.comments.read().await.clone()
    }
}

impl Default for CommentStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone)]
pub struct AppState {
    pub comments: CommentStore,
}

impl AppState {
    #[must_use]
    pub fn new(comments: CommentStore) -> Self {
        Self { comments }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
