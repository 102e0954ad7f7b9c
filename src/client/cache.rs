use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{broadcast, watch};
use tracing::debug;

use crate::models::Todo;

/// Cache key of the todo list query.
pub const TODOS_KEY: &str = "todos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Last fetched list, `None` until the first fetch succeeds.
    pub data: Option<Vec<Todo>>,
    /// True until the first fetch has resolved either way.
    pub is_loading: bool,
    pub is_fetching: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: true,
            is_fetching: false,
        }
    }
}

/// Process-wide store of query results keyed by cache key.
///
/// Mutations never touch cached data directly. They call [`QueryCache::invalidate`]
/// and whichever query owns the key refetches.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

struct Inner {
    entries: Mutex<HashMap<String, Arc<watch::Sender<QueryState>>>>,
    invalidations: broadcast::Sender<String>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (invalidations, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                invalidations,
            }),
        }
    }

    /// Returns the entry for `key`, creating an empty one on first use.
    pub fn entry(&self, key: &str) -> Arc<watch::Sender<QueryState>> {
        let mut entries = self
            .inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(watch::channel(QueryState::default()).0))
            .clone()
    }

    pub fn get(&self, key: &str) -> Option<Vec<Todo>> {
        let entries = self
            .inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.get(key).and_then(|entry| entry.borrow().data.clone())
    }

    pub fn invalidate(&self, key: &str) {
        // No listener just means nothing is mounted for this key.
        let listeners = self.inner.invalidations.send(key.to_string()).unwrap_or(0);
        debug!(key, listeners, "invalidated query");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.inner.invalidations.subscribe()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}
