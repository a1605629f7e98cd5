use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::Json as ResponseJson,
    routing::{delete, get, post, put},
};
use db::models::project::{AddProjectMember, CreateProject, Project, UpdateProject};
use serde::Deserialize;
use services::services::project::ProjectService;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{Json, Path},
    middleware::{Caller, load_project_middleware, require_project_manager},
};

#[derive(Debug, Deserialize)]
pub struct MemberPath {
    pub user_id: Uuid,
}

pub async fn get_projects(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Project>>>, ApiError> {
    let projects = ProjectService::list(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(projects)))
}

pub async fn get_project(
    Extension(project): Extension<Project>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(project)))
}

/// The caller becomes the owner.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(Caller(caller)): Extension<Caller>,
    Json(payload): Json<CreateProject>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Project>>), ApiError> {
    let project = ProjectService::create(&state.db().pool, caller.id, payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(project))))
}

pub async fn update_project(
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateProject>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = ProjectService::update(&state.db().pool, project.id, payload).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn delete_project(
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    ProjectService::delete(&state.db().pool, project.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub async fn add_project_member(
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
    Json(payload): Json<AddProjectMember>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = ProjectService::add_member(&state.db().pool, project.id, payload.user_id).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub async fn remove_project_member(
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
    Path(MemberPath { user_id }): Path<MemberPath>,
) -> Result<ResponseJson<ApiResponse<Project>>, ApiError> {
    let project = ProjectService::remove_member(&state.db().pool, project.id, user_id).await?;
    Ok(ResponseJson(ApiResponse::success(project)))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let manage = from_fn(require_project_manager);

    let project_id_router = Router::new()
        .route(
            "/",
            get(get_project).merge(
                put(update_project)
                    .delete(delete_project)
                    .route_layer(manage.clone()),
            ),
        )
        .route("/members", post(add_project_member).route_layer(manage.clone()))
        .route(
            "/members/{user_id}",
            delete(remove_project_member).route_layer(manage),
        )
        .layer(from_fn_with_state(state.clone(), load_project_middleware));

    let projects_router = Router::new()
        .route("/", get(get_projects).post(create_project))
        .nest("/{id}", project_id_router);

    Router::new().nest("/projects", projects_router)
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use db::models::user::{CreateUser, User, UserRole};
    use serde_json::{Value, json};
    use services::services::user::DEMO_USER_ID;
    use tower::ServiceExt;

    use crate::{
        middleware::USER_ID_HEADER,
        test_support::{body_json, test_app},
    };

    use super::*;

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn seed_user(state: &AppState, name: &str, role: UserRole) -> Uuid {
        let data = CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            role: Some(role),
        };
        User::create(&state.db().pool, &data, Uuid::new_v4())
            .await
            .unwrap()
            .id
    }

    async fn create(app: &Router, name: &str) -> Value {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/projects", json!({ "name": name })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = body_json(response.into_body()).await;
        body["data"].clone()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (app, _) = test_app().await;
        let created = create(&app, "X").await;
        let id = created["id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/api/projects/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["name"], "X");
        assert_eq!(body["data"]["members"], json!([]));
        assert_eq!(body["data"]["owner_id"], DEMO_USER_ID.to_string());
    }

    #[tokio::test]
    async fn create_without_name_is_bad_request() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(json_request("POST", "/api/projects", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "project name is required");
    }

    #[tokio::test]
    async fn mistyped_body_is_reported_in_envelope() {
        let (app, _) = test_app().await;

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/projects", json!({ "name": 5 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/projects")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn malformed_project_id_is_bad_request() {
        let (app, _) = test_app().await;

        let response = app
            .oneshot(empty_request("GET", "/api/projects/not-a-uuid"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn list_returns_created_projects() {
        let (app, _) = test_app().await;
        create(&app, "first").await;
        create(&app, "second").await;

        let response = app
            .oneshot(empty_request("GET", "/api/projects"))
            .await
            .unwrap();
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_patches_name() {
        let (app, _) = test_app().await;
        let id = create(&app, "X").await["id"].as_str().unwrap().to_string();

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/projects/{id}"),
                json!({ "name": "Renamed" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["data"]["name"], "Renamed");
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let (app, _) = test_app().await;
        let id = create(&app, "X").await["id"].as_str().unwrap().to_string();
        let uri = format!("/api/projects/{id}");

        let response = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn adding_a_member_twice_conflicts() {
        let (app, state) = test_app().await;
        let bob = seed_user(&state, "bob", UserRole::Member).await;
        let id = create(&app, "X").await["id"].as_str().unwrap().to_string();
        let uri = format!("/api/projects/{id}/members");

        let response = app
            .clone()
            .oneshot(json_request("POST", &uri, json!({ "user_id": bob })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["data"]["members"], json!([bob]));

        let response = app
            .clone()
            .oneshot(json_request("POST", &uri, json!({ "user_id": bob })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(empty_request("GET", &format!("/api/projects/{id}")))
            .await
            .unwrap();
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["data"]["members"], json!([bob]));
    }

    #[tokio::test]
    async fn remove_member_checks_membership() {
        let (app, state) = test_app().await;
        let bob = seed_user(&state, "bob", UserRole::Member).await;
        let id = create(&app, "X").await["id"].as_str().unwrap().to_string();

        app.clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/projects/{id}/members"),
                json!({ "user_id": bob }),
            ))
            .await
            .unwrap();

        let uri = format!("/api/projects/{id}/members/{bob}");
        let response = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["data"]["members"], json!([]));

        let response = app.oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn remove_member_is_forbidden_for_plain_members() {
        let (app, state) = test_app().await;
        let bob = seed_user(&state, "bob", UserRole::Member).await;
        let id = create(&app, "X").await["id"].as_str().unwrap().to_string();

        app.clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/projects/{id}/members"),
                json!({ "user_id": bob }),
            ))
            .await
            .unwrap();

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/projects/{id}/members/{bob}"))
            .header(USER_ID_HEADER, bob.to_string())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(empty_request("GET", &format!("/api/projects/{id}")))
            .await
            .unwrap();
        let body: Value = body_json(response.into_body()).await;
        assert_eq!(body["data"]["members"], json!([bob]));
    }

    #[tokio::test]
    async fn owner_manages_own_project_without_lead_role() {
        let (app, state) = test_app().await;
        let carol = seed_user(&state, "carol", UserRole::Member).await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/projects")
            .header("content-type", "application/json")
            .header(USER_ID_HEADER, carol.to_string())
            .body(Body::from(json!({ "name": "Carol's" }).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let body: Value = body_json(response.into_body()).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/projects/{id}"))
            .header(USER_ID_HEADER, carol.to_string())
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_caller_is_unauthorized_on_mutation_only() {
        let (app, _) = test_app().await;
        let stranger = Uuid::new_v4();

        let request = Request::builder()
            .method("POST")
            .uri("/api/projects")
            .header("content-type", "application/json")
            .header(USER_ID_HEADER, stranger.to_string())
            .body(Body::from(json!({ "name": "X" }).to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .method("GET")
            .uri("/api/projects")
            .header(USER_ID_HEADER, stranger.to_string())
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_project_is_not_found_for_member_routes() {
        let (app, _) = test_app().await;
        let missing = Uuid::new_v4();

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/projects/{missing}/members"),
                json!({ "user_id": DEMO_USER_ID }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
