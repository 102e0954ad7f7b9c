pub mod repository;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::AppError;
use crate::models::{NewTodoRequest, Todo, UpdateTodoRequest};

/// Handle to the todo store.
///
/// Built once at startup and handed to the router through `AppState`.
/// Cloning is cheap and shares the same connection pool.
#[derive(Clone, Debug)]
pub struct Store {
    db: SqlitePool,
}

impl Store {
    /// Opens the database at `url`, creating the file if needed, and applies
    /// pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { db: pool };
        store.migrate().await?;
        info!("store ready at {}", url);
        Ok(store)
    }

    /// A private in-memory database. The pool is pinned to a single
    /// connection that never expires, otherwise the data would vanish.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { db: pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("select 1").execute(&self.db).await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Todo>, AppError> {
        Ok(repository::fetch_todos(&self.db).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Todo>, AppError> {
        Ok(repository::find_todo_by_id(&self.db, id).await?)
    }

    pub async fn create(&self, req: NewTodoRequest) -> Result<Todo, AppError> {
        Ok(repository::insert_todo(&self.db, req).await?)
    }

    /// Returns `None` when no todo has this id.
    pub async fn update(
        &self,
        id: i64,
        req: UpdateTodoRequest,
    ) -> Result<Option<Todo>, AppError> {
        Ok(repository::update_todo(&self.db, id, req).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(repository::delete_todo(&self.db, id).await?)
    }

    pub async fn close(&self) {
        self.db.close().await;
        info!("store closed");
    }
}
