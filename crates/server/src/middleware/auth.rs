//! Caller resolution and server-side authorization gates.

use axum::{
    Extension,
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use db::models::{project::Project, user::User};
use services::services::policy::{AccessPolicy, PolicyError};

use crate::{AppState, error::ApiError};

/// Header carrying the id of the user a request acts as.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The user a mutating request is attributed to.
#[derive(Debug, Clone)]
pub struct Caller(pub User);

fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Resolves the caller of every mutating request; reads pass straight through.
pub async fn require_caller(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_read_only(request.method()) {
        return Ok(next.run(request).await);
    }

    let claimed = match request.headers().get(USER_ID_HEADER) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| PolicyError::InvalidIdentity("<non-ascii header>".to_string()))?
                .to_string(),
        ),
        None => None,
    };

    let user = AccessPolicy::resolve_caller(
        &state.db().pool,
        claimed.as_deref(),
        state.config().demo_fallback(),
    )
    .await?;

    request.extensions_mut().insert(Caller(user));
    Ok(next.run(request).await)
}

/// Only the project owner or a lead gets past this gate.
pub async fn require_project_manager(
    Extension(Caller(caller)): Extension<Caller>,
    Extension(project): Extension<Project>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    AccessPolicy::authorize_project_management(&caller, &project)?;
    Ok(next.run(request).await)
}

/// Only leads get past this gate.
pub async fn require_lead(
    Extension(Caller(caller)): Extension<Caller>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    AccessPolicy::authorize_user_admin(&caller)?;
    Ok(next.run(request).await)
}
