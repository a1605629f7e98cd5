use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, patch},
};
use db::models::task::{
    CreateTask, Task, TaskFilter, UpdateTaskAssignee, UpdateTaskDescription, UpdateTaskPriority,
    UpdateTaskStatus, UpdateTaskTitle,
};
use services::services::task::TaskService;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{Json, Path, Query},
};

type TaskResponse = Result<ResponseJson<ApiResponse<Task>>, ApiError>;

pub async fn get_tasks(
    State(state): State<AppState>,
    Query(filter): Query<TaskFilter>,
) -> Result<ResponseJson<ApiResponse<Vec<Task>>>, ApiError> {
    let tasks = TaskService::list(&state.db().pool, &filter).await?;
    Ok(ResponseJson(ApiResponse::success(tasks)))
}

pub async fn get_task(State(state): State<AppState>, Path(task_id): Path<Uuid>) -> TaskResponse {
    let task = TaskService::get(&state.db().pool, task_id).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTask>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Task>>), ApiError> {
    let task = TaskService::create(&state.db().pool, payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(task))))
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskStatus>,
) -> TaskResponse {
    let task = TaskService::update_status(&state.db().pool, task_id, payload.status).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task_assignee(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskAssignee>,
) -> TaskResponse {
    let task = TaskService::update_assignee(&state.db().pool, task_id, payload.assignee_id).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task_priority(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskPriority>,
) -> TaskResponse {
    let task = TaskService::update_priority(&state.db().pool, task_id, payload.priority).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task_title(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskTitle>,
) -> TaskResponse {
    let task = TaskService::update_title(&state.db().pool, task_id, &payload.title).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn update_task_description(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskDescription>,
) -> TaskResponse {
    let task =
        TaskService::update_description(&state.db().pool, task_id, payload.description.as_deref())
            .await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    TaskService::delete(&state.db().pool, task_id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    let task_id_router = Router::new()
        .route("/", get(get_task).delete(delete_task))
        .route("/status", patch(update_task_status))
        .route("/assignee", patch(update_task_assignee))
        .route("/priority", patch(update_task_priority))
        .route("/title", patch(update_task_title))
        .route("/description", patch(update_task_description));

    let tasks_router = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .nest("/{id}", task_id_router);

    Router::new().nest("/tasks", tasks_router)
}
