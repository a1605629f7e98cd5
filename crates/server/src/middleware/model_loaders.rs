use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use services::services::project::ProjectService;
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::Path};

#[derive(Debug, Deserialize)]
pub struct ProjectPath {
    pub id: Uuid,
}

/// Loads the project named by `{id}` into request extensions, or answers 404.
pub async fn load_project_middleware(
    State(state): State<AppState>,
    Path(ProjectPath { id }): Path<ProjectPath>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let project = ProjectService::get(&state.db().pool, id).await?;
    request.extensions_mut().insert(project);
    Ok(next.run(request).await)
}
