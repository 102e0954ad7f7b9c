use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::cache::{QueryCache, QueryState, TODOS_KEY};
use super::TodoApi;
use crate::models::{NewTodoRequest, Todo, UpdateTodoRequest};

/// Mutation entry points shared by the components. Each successful call
/// invalidates the todo list; failures are logged and otherwise ignored.
#[derive(Clone)]
pub struct TodoActions {
    api: Arc<dyn TodoApi>,
    cache: QueryCache,
}

impl TodoActions {
    pub fn new(api: Arc<dyn TodoApi>, cache: QueryCache) -> Self {
        Self { api, cache }
    }

    async fn create(&self, req: NewTodoRequest) -> Option<Todo> {
        match self.api.create_todo(&req).await {
            Ok(todo) => {
                self.cache.invalidate(TODOS_KEY);
                Some(todo)
            }
            Err(err) => {
                warn!("create todo failed: {}", err);
                None
            }
        }
    }

    async fn update(&self, id: i64, req: UpdateTodoRequest) -> bool {
        match self.api.update_todo(id, &req).await {
            Ok(()) => {
                self.cache.invalidate(TODOS_KEY);
                true
            }
            Err(err) => {
                warn!(id, "update todo failed: {}", err);
                false
            }
        }
    }

    async fn delete(&self, id: i64) -> bool {
        match self.api.delete_todo(id).await {
            Ok(()) => {
                self.cache.invalidate(TODOS_KEY);
                true
            }
            Err(err) => {
                warn!(id, "delete todo failed: {}", err);
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Cards(Vec<TodoCard>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoCard {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub toggle_label: &'static str,
}

impl ListView {
    pub fn render(state: &QueryState) -> Self {
        match &state.data {
            None => ListView::Loading,
            Some(todos) => ListView::Cards(todos.iter().map(TodoCard::from).collect()),
        }
    }
}

impl From<&Todo> for TodoCard {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title.clone(),
            description: todo.description.clone(),
            is_done: todo.is_done,
            toggle_label: ToggleButton::label_for(todo.is_done),
        }
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListView::Loading => writeln!(f, "Loading..."),
            ListView::Cards(cards) if cards.is_empty() => writeln!(f, "No todos"),
            ListView::Cards(cards) => cards.iter().try_for_each(|card| writeln!(f, "{}", card)),
        }
    }
}

impl fmt::Display for TodoCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_done { 'x' } else { ' ' };
        write!(f, "[{}] #{} {}", mark, self.id, self.title)?;
        if let Some(description) = &self.description {
            write!(f, " - {}", description)?;
        }
        write!(f, "  ({})", self.toggle_label)
    }
}

/// Creation form with two text inputs held as local state.
#[derive(Debug, Clone, Default)]
pub struct CreateTodoForm {
    pub title: String,
    pub description: String,
}

impl CreateTodoForm {
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Sends both inputs as typed, except that an empty description is sent
    /// as `null`. Inputs are cleared only on success.
    pub async fn submit(&mut self, actions: &TodoActions) -> Option<Todo> {
        let description = match self.description.as_str() {
            "" => None,
            text => Some(text.to_string()),
        };
        let req = NewTodoRequest {
            title: self.title.clone(),
            description,
        };

        let todo = actions.create(req).await?;
        self.title.clear();
        self.description.clear();
        Some(todo)
    }
}

#[derive(Debug, Clone)]
pub struct ToggleButton {
    todo: Todo,
}

impl ToggleButton {
    pub fn new(todo: Todo) -> Self {
        Self { todo }
    }

    pub fn label_for(is_done: bool) -> &'static str {
        if is_done { "Mark as not done" } else { "Mark as done" }
    }

    pub fn label(&self) -> &'static str {
        Self::label_for(self.todo.is_done)
    }

    /// Writes back the whole record with `is_done` flipped.
    pub async fn click(&self, actions: &TodoActions) -> bool {
        let mut req = UpdateTodoRequest::overwrite(&self.todo);
        req.is_done = Some(!self.todo.is_done);
        actions.update(self.todo.id, req).await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteButton {
    id: i64,
}

impl DeleteButton {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub async fn click(&self, actions: &TodoActions) -> bool {
        actions.delete(self.id).await
    }
}
