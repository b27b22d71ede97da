//! HTTP server implementation for the Task API.
//!
//! Axum handlers translate requests into service calls and map errors onto
//! the wire shapes via [`ApiError::into_http_response`].

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::service::{TaskCreateRequest, TaskService};
use crate::types::Task;

/// Server state shared across handlers.
#[derive(Clone)]
struct ApiServer {
    service: Arc<TaskService>,
}

/// Wire representation of a task.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            created_at: millis_to_utc(task.created_at),
            updated_at: millis_to_utc(task.updated_at),
        }
    }
}

fn millis_to_utc(ms: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(ms).unwrap_or_default()
}

/// Creates a new task.
/// POST /tasks
async fn create_task(
    State(state): State<ApiServer>,
    OriginalUri(uri): OriginalUri,
    Json(request): Json<TaskCreateRequest>,
) -> Response {
    info!("POST /tasks - Creating new task");

    // Validate at the boundary before invoking business logic.
    let errors = request.validate();
    if !errors.is_empty() {
        return ApiError::Validation(errors).into_http_response(uri.path());
    }

    match state.service.create_task(&request) {
        Ok(task) => (StatusCode::CREATED, Json(TaskResponse::from(task))).into_response(),
        Err(err) => err.into_http_response(uri.path()),
    }
}

/// Gets the 5 most recent non-completed tasks.
/// GET /tasks
async fn get_recent_tasks(
    State(state): State<ApiServer>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    info!("GET /tasks - Fetching recent tasks");

    match state.service.recent_tasks() {
        Ok(tasks) => {
            let body: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();
            Json(body).into_response()
        }
        Err(err) => err.into_http_response(uri.path()),
    }
}

/// Marks a task as completed.
/// PUT /tasks/{id}/complete
async fn complete_task(
    State(state): State<ApiServer>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<i64>,
) -> Response {
    info!(id, "PUT /tasks/{{id}}/complete - Marking task as completed");

    match state.service.complete_task(id) {
        Ok(task) => Json(TaskResponse::from(task)).into_response(),
        Err(err) => err.into_http_response(uri.path()),
    }
}

/// Deletes all tasks - FOR TESTING PURPOSES ONLY.
/// DELETE /tasks
async fn delete_all_tasks(
    State(state): State<ApiServer>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    warn!("DELETE /tasks - Deleting ALL tasks (test endpoint)");

    match state.service.delete_all_tasks() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_http_response(uri.path()),
    }
}

/// Health check endpoint. Stateless, no store dependency.
/// GET /tasks/health
async fn health() -> &'static str {
    "Task API is running"
}

/// CORS layer: a single configured origin, or permissive when unset.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin.map(|o| o.parse::<HeaderValue>()) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(Err(_)) => {
            warn!("Invalid cors_origin value, allowing any origin");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}

/// Build the router with all routes.
pub fn build_router(service: Arc<TaskService>, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route(
            "/tasks",
            get(get_recent_tasks)
                .post(create_task)
                .delete(delete_all_tasks),
        )
        .route("/tasks/{id}/complete", put(complete_task))
        .route("/tasks/health", get(health))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(ApiServer { service })
}

/// Start the HTTP server on the specified port.
///
/// Returns a oneshot sender that can be used to signal shutdown,
/// and the actual address the server is bound to.
pub async fn start_server(
    service: Arc<TaskService>,
    port: u16,
    cors_origin: Option<String>,
) -> anyhow::Result<(oneshot::Sender<()>, SocketAddr)> {
    let app = build_router(service, cors_origin.as_deref());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Task API listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Task API shutting down");
            })
            .await
        {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((shutdown_tx, bound_addr))
}
