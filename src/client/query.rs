use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::cache::{QueryCache, QueryState, TODOS_KEY};
use super::{ClientError, TodoApi};
use crate::models::Todo;

/// The todo list query: `GET /api/todos` cached under [`TODOS_KEY`].
#[derive(Clone)]
pub struct TodosQuery {
    api: Arc<dyn TodoApi>,
    cache: QueryCache,
    state: Arc<watch::Sender<QueryState>>,
}

impl TodosQuery {
    pub fn new(api: Arc<dyn TodoApi>, cache: QueryCache) -> Self {
        let state = cache.entry(TODOS_KEY);
        Self { api, cache, state }
    }

    pub fn state(&self) -> QueryState {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<Vec<Todo>> {
        self.state.borrow().data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Receiver that wakes on every state change.
    pub fn watch(&self) -> watch::Receiver<QueryState> {
        self.state.subscribe()
    }

    /// Re-issues the list call and replaces the cached result. On failure the
    /// previous data is kept.
    pub async fn refetch(&self) -> Result<(), ClientError> {
        self.state.send_modify(|state| state.is_fetching = true);

        match self.api.list_todos().await {
            Ok(todos) => {
                debug!(count = todos.len(), "todo list fetched");
                self.state.send_modify(move |state| {
                    state.data = Some(todos);
                    state.is_loading = false;
                    state.is_fetching = false;
                });
                Ok(())
            }
            Err(err) => {
                self.state.send_modify(|state| {
                    state.is_loading = false;
                    state.is_fetching = false;
                });
                Err(err)
            }
        }
    }

    /// Refetches whenever [`TODOS_KEY`] is invalidated. Runs until the
    /// returned handle is aborted.
    pub fn spawn_invalidation_listener(&self) -> JoinHandle<()> {
        let mut invalidations = self.cache.subscribe();
        let query = self.clone();

        tokio::spawn(async move {
            loop {
                match invalidations.recv().await {
                    Ok(key) if key == TODOS_KEY => {}
                    Ok(_) => continue,
                    // Missed some signals; one refetch covers all of them.
                    Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
                if let Err(err) = query.refetch().await {
                    warn!("refetch after invalidation failed: {}", err);
                }
            }
        })
    }
}
