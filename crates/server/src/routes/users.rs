use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::user::{CreateUser, UpdateUser, User};
use services::services::{policy::AccessPolicy, user::UserService};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{Json, Path},
    middleware::{Caller, require_lead},
};

pub async fn get_users(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, ApiError> {
    let users = UserService::list(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(users)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    let user = UserService::get(&state.db().pool, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUser>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<User>>), ApiError> {
    let user = UserService::create(&state.db().pool, payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(user))))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(Caller(caller)): Extension<Caller>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    AccessPolicy::authorize_user_update(&caller, user_id, &payload)?;
    let user = UserService::update(&state.db().pool, user_id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    UserService::delete(&state.db().pool, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    let users_router = Router::new()
        .route(
            "/",
            get(get_users).merge(post(create_user).route_layer(from_fn(require_lead))),
        )
        .route(
            "/{id}",
            get(get_user)
                .put(update_user)
                .merge(delete(delete_user).route_layer(from_fn(require_lead))),
        );

    Router::new().nest("/users", users_router)
}
