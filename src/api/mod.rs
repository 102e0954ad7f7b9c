use axum::Json;
use axum::extract::Path;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.ping().await?;
    Ok(StatusCode::OK)
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.store.list().await?;
    Ok(Json(todos))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<Json<Option<Todo>>, AppError> {
    let todo = state.store.get(id).await?;
    Ok(Json(todo))
}

async fn create_todo(
    State(state): State<AppState>,
    Json(req): Json<NewTodoRequest>
) -> Result<(StatusCode, Json<Todo>), AppError> {
    let todo = state.store.create(req).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodoRequest>
) -> Result<StatusCode, AppError> {
    state.store
        .update(id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<i64>
) -> Result<StatusCode, AppError> {
    let ok = state.store.delete(id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
