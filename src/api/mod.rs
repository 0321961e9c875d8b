pub mod dto;
pub mod extract;

use crate::api::dto::{
    ErrorResponse, Pagination, TaskCreateRequest, TaskResponse, TaskUpdateRequest,
};
use crate::api::extract::{JsonContentType, TaskId, ValidJson};
use crate::errors::AppError;
use crate::service::TaskService;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Query, Request, State, rejection::QueryRejection},
    http::{HeaderName, HeaderValue, StatusCode},
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;


pub const API_DOCS_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger";

/// Largest accepted request body. Bigger bodies get 413.
pub const BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn TaskService>,
}

#[derive(Clone, Copy)]
pub struct MakeUuidRequest;

impl MakeRequestId for MakeUuidRequest {
    fn make_request_id<B>(&mut self, _: &axum::http::Request<B>) -> Option<RequestId> {
        let uuid = Uuid::new_v4().to_string();

        let header_value =
            HeaderValue::from_str(&uuid).unwrap_or(HeaderValue::from_static("invalid-uuid"));

        Some(RequestId::new(header_value))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(create_task, list_tasks, get_task, update_task, delete_task),
    components(schemas(TaskCreateRequest, TaskUpdateRequest, TaskResponse, ErrorResponse)),
    tags((name = "tasks", description = "Task API"))
)]
pub struct ApiDoc;

/// Build the application router with all routes and middleware
///
/// # Arguments
///
/// * `service` - Task service backing the handlers
/// * `api_docs` - Whether to serve Swagger UI at [`SWAGGER_UI_PATH`] and the
///   OpenAPI document at [`API_DOCS_PATH`]
///
/// # Returns
/// * `Router` - The configured Axum router
pub fn router(service: Arc<dyn TaskService>, api_docs: bool) -> Router {
    let state = AppState { service };

    let x_request_id = HeaderName::from_static("x-request-id");

    let mut routes = Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        );

    if api_docs {
        routes = routes.merge(
            SwaggerUi::new(SWAGGER_UI_PATH).url(API_DOCS_PATH, ApiDoc::openapi()),
        );
    }

    routes
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let req_id = request
                        .extensions()
                        .get::<RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or("bad-ascii"))
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        request_id = %req_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeUuidRequest))
}

/// Handler to create a new task
///
/// # Errors
///
/// * `AppError::Validation` - Wrong content type, malformed JSON or invalid fields
/// * `AppError` - Any storage failure reported by the service
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    request_body = TaskCreateRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn create_task(
    State(state): State<AppState>,
    _: JsonContentType,
    ValidJson(create): ValidJson<TaskCreateRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    let task = state.service.create(create).await?;

    tracing::info!(task_id = task.id, "Task Created Successfully");

    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

/// Handler to list all tasks
///
/// `offset` and `limit` are accepted but not applied.
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    params(Pagination),
    responses(
        (status = 200, description = "All tasks", body = Vec<TaskResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn list_tasks(
    State(state): State<AppState>,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let Query(pagination) = pagination.map_err(|e| AppError::Validation(e.body_text()))?;
    tracing::debug!(?pagination, "Listing tasks");

    let tasks = match state.service.list().await {
        Ok(tasks) => tasks,
        Err(AppError::NotFound) => Vec::new(),
        Err(e) => return Err(e),
    };

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// Handler to fetch a task by its ID
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_task(
    State(state): State<AppState>,
    TaskId(id): TaskId,
) -> Result<Json<TaskResponse>, AppError> {
    let task = state.service.find_by_id(id).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Handler to replace a task's title, description and due date
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    request_body = TaskUpdateRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn update_task(
    State(state): State<AppState>,
    _: JsonContentType,
    TaskId(id): TaskId,
    ValidJson(update): ValidJson<TaskUpdateRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    let task = state.service.update_by_id(id, update).await?;

    Ok(Json(TaskResponse::from(task)))
}

/// Handler to delete a task by its ID
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "tasks",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn delete_task(
    State(state): State<AppState>,
    TaskId(id): TaskId,
) -> Result<StatusCode, AppError> {
    state.service.delete_by_id(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
