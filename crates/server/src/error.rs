use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{
    policy::PolicyError, project::ProjectServiceError, task::TaskServiceError,
    user::UserServiceError,
};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Project(#[from] ProjectServiceError),
    #[error(transparent)]
    User(#[from] UserServiceError),
    #[error(transparent)]
    Task(#[from] TaskServiceError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error(transparent)]
    Path(#[from] PathRejection),
    #[error(transparent)]
    Query(#[from] QueryRejection),
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Project(err) => match err {
                ProjectServiceError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
                ProjectServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
                ProjectServiceError::ProjectNotFound
                | ProjectServiceError::UserNotFound
                | ProjectServiceError::MemberNotFound => (StatusCode::NOT_FOUND, "NotFound"),
                ProjectServiceError::AlreadyMember => (StatusCode::CONFLICT, "Conflict"),
            },
            ApiError::User(err) => match err {
                UserServiceError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
                UserServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
                UserServiceError::NotFound => (StatusCode::NOT_FOUND, "NotFound"),
                UserServiceError::EmailTaken | UserServiceError::OwnsProjects(_) => {
                    (StatusCode::CONFLICT, "Conflict")
                }
            },
            ApiError::Task(err) => match err {
                TaskServiceError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
                TaskServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
                TaskServiceError::NotFound | TaskServiceError::AssigneeNotFound => {
                    (StatusCode::NOT_FOUND, "NotFound")
                }
            },
            ApiError::Policy(err) => match err {
                PolicyError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
                PolicyError::MissingIdentity
                | PolicyError::InvalidIdentity(_)
                | PolicyError::UnknownCaller => (StatusCode::UNAUTHORIZED, "Unauthorized"),
                PolicyError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden"),
            },
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            ApiError::Json(_) | ApiError::Path(_) | ApiError::Query(_) => {
                (StatusCode::BAD_REQUEST, "ValidationError")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = self.status_and_type();

        let error_message = if status_code.is_server_error() {
            tracing::error!(error_type, error = %self, "Request failed");
            "An internal error occurred. Please try again.".to_string()
        } else {
            tracing::debug!(error_type, error = %self, "Request rejected");
            self.to_string()
        };

        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
