use crate::db::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}
