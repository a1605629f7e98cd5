use axum::{Router, middleware::from_fn_with_state};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, middleware::require_caller};

pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health::router())
        .merge(projects::router(&state))
        .merge(users::router())
        .merge(tasks::router())
        .layer(from_fn_with_state(state.clone(), require_caller));

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http());

    if state.config().cors_permissive {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}
