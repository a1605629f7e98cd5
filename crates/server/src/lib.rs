use std::sync::Arc;

use db::DBService;

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

use config::ServerConfig;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: DBService, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{Router, body::Body};
    use http_body_util::BodyExt;
    use services::services::user::UserService;

    use super::*;

    pub async fn test_state() -> AppState {
        let db = DBService::new_in_memory().await.unwrap();
        UserService::ensure_demo_user(&db.pool).await.unwrap();
        AppState::new(db, ServerConfig::default())
    }

    pub async fn test_app() -> (Router, AppState) {
        let state = test_state().await;
        (routes::router(state.clone()), state)
    }

    pub async fn body_json<T: serde::de::DeserializeOwned>(body: Body) -> T {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
