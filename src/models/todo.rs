use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodoRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial overwrite of a todo. Fields left out of the payload keep their
/// stored value; `description: null` clears the description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done: Option<bool>,
}

impl UpdateTodoRequest {
    /// Full-record overwrite built from an existing todo.
    pub fn overwrite(todo: &Todo) -> Self {
        Self {
            title: Some(todo.title.clone()),
            description: Some(todo.description.clone()),
            is_done: Some(todo.is_done),
        }
    }
}

// Only called when the key is present, so `null` becomes `Some(None)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
