//! HTTP server for the Shark Tank report API.
//!
//! # API Endpoints
//!
//! | Method | Path                    | Description                          |
//! |--------|-------------------------|--------------------------------------|
//! | GET    | `/health`               | Health check                         |
//! | POST   | `/api/upload`           | Run the pipeline on an uploaded CSV  |
//! | GET    | `/api/summary`          | Investor summary artifact            |
//! | GET    | `/api/cooperation`      | Cooperation matrix artifact          |
//! | GET    | `/api/report`           | Filtered report dataset              |
//! | GET    | `/api/startups/{name}`  | Rows of one startup                  |
//! | GET    | `/api/logs`             | SSE stream for real-time logs        |
//!
//! Artifact endpoints read the files of the last pipeline run and answer 404
//! until they exist.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::path::Path as FsPath;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{ReportQuery, UploadResponse};
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::models::{CooperationMatrix, CooperationRow};
use crate::report::{build_report, find_startup, Report, ReportFilter};
use crate::table::Table;
use crate::transform::{load_cleaned, load_cooperation, transform_bytes, ArtifactPaths};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub artifacts: Arc<ArtifactPaths>,
}

impl AppState {
    pub fn new(artifacts: ArtifactPaths) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_csv))
        .route("/api/summary", get(get_summary))
        .route("/api/cooperation", get(get_cooperation))
        .route("/api/report", get(get_report))
        .route("/api/startups/{name}", get(get_startup))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(port: u16, artifacts: ArtifactPaths) -> ServerResult<()> {
    let app = router(AppState::new(artifacts));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Internal(format!("bind {}: {}", addr, e)))?;
    tracing::info!(%addr, "sharktank server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
}

/// Health check endpoint
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "sharktank",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "summary": "GET /api/summary",
            "cooperation": "GET /api/cooperation",
            "report": "GET /api/report",
            "startup": "GET /api/startups/{name}",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
pub async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Run the pipeline in memory on the uploaded `file` field
pub async fn upload_csv(mut multipart: Multipart) -> ServerResult<Json<UploadResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            file_data = Some(bytes.to_vec());
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;
    tokio::task::spawn_blocking(move || process_upload(file_name.as_deref(), &bytes))
        .await
        .map_err(join_error)?
        .map(Json)
}

fn process_upload(file_name: Option<&str>, bytes: &[u8]) -> ServerResult<UploadResponse> {
    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.unwrap_or("unknown"),
        bytes.len()
    ));

    let output = transform_bytes(bytes, None).map_err(|e| {
        log_error(format!("Upload failed: {}", e));
        ServerError::BadRequest(e.to_string())
    })?;
    Ok(UploadResponse::from(output))
}

/// Investor summary artifact as written
pub async fn get_summary(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    let path = state
        .artifacts
        .summary
        .as_deref()
        .ok_or_else(|| ServerError::ArtifactMissing("investor summary".into()))?;

    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(artifact_missing(path));
        }
        Err(e) => return Err(ServerError::Internal(e.to_string())),
    };
    let summary = serde_json::from_str(&text).map_err(PipelineError::from)?;
    Ok(Json(summary))
}

/// Cooperation matrix artifact as rows
pub async fn get_cooperation(State(state): State<AppState>) -> ServerResult<Json<Vec<CooperationRow>>> {
    let matrix = blocking(&state, cooperation).await?;
    Ok(Json(matrix.rows()))
}

/// Report dataset for the filter in the query string
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ServerResult<Json<Report>> {
    let filter = ReportFilter::from(query);
    let report = blocking(&state, move |state| {
        let cleaned = cleaned(state)?;
        let matrix = cooperation(state)?;
        Ok(build_report(&cleaned, &matrix, &filter))
    })
    .await?;
    Ok(Json(report))
}

/// Rows whose startup name matches exactly
pub async fn get_startup(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ServerResult<Json<Vec<Value>>> {
    let rows = blocking(&state, move |state| Ok(find_startup(&cleaned(state)?, &name))).await?;
    Ok(Json(rows))
}

/// Run artifact reads off the async worker threads.
async fn blocking<T, F>(state: &AppState, read: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> ServerResult<T> + Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || read(&state))
        .await
        .map_err(join_error)?
}

fn join_error(err: tokio::task::JoinError) -> ServerError {
    ServerError::Internal(format!("Worker task failed: {}", err))
}

fn cleaned(state: &AppState) -> ServerResult<Table> {
    let path = &state.artifacts.cleaned;
    load_cleaned(path).map_err(|e| missing_or(e, path))
}

fn cooperation(state: &AppState) -> ServerResult<CooperationMatrix> {
    let path = &state.artifacts.cooperation;
    load_cooperation(path).map_err(|e| missing_or(e, path))
}

fn missing_or(err: PipelineError, path: &FsPath) -> ServerError {
    if err.is_missing_source() {
        artifact_missing(path)
    } else {
        ServerError::Pipeline(err)
    }
}

fn artifact_missing(path: &FsPath) -> ServerError {
    ServerError::ArtifactMissing(path.display().to_string())
}
