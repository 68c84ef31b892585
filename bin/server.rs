// 🌐 Memorial Dates - Web Server
// REST API with Axum: validate entries, save page reports, browse history

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use memorial_dates::{
    get_report, get_report_summaries, insert_report, setup_database, DateConsistencyValidator,
    MemorialEntry, PageReport, ValidatorConfig, VERSION,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    db: Arc<Mutex<Connection>>,
    validator: Arc<DateConsistencyValidator>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        let body = Self {
            success: true,
            data: Some(data),
            error: None,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiResponse::<()> {
        success: false,
        data: None,
        error: Some(message.into()),
    };
    (status, Json(body)).into_response()
}

/// POST /api/reports body (same shape the OCR step returns, plus a label)
#[derive(Deserialize)]
struct CreateReportRequest {
    #[serde(default)]
    source: Option<String>,
    memorials: Vec<MemorialEntry>,
}

#[derive(Serialize)]
struct CreateReportResponse {
    saved: bool,
    report: PageReport,
}

fn lock_db(state: &AppState) -> Result<MutexGuard<'_, Connection>, Response> {
    state.db.lock().map_err(|_| {
        error!("database lock poisoned");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
    })
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok(format!("OK (memorial-dates {VERSION})"))
}

/// POST /api/validate - Check one entry without saving
async fn validate_entry(
    State(state): State<AppState>,
    Json(entry): Json<MemorialEntry>,
) -> Response {
    ApiResponse::ok(state.validator.validate_entry(&entry))
}

/// POST /api/reports - Validate a page and save it to history
async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<CreateReportRequest>,
) -> Response {
    let source = request.source.unwrap_or_else(|| "upload".to_string());
    let report = PageReport::build(&source, request.memorials, &state.validator);

    let conn = match lock_db(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match insert_report(&conn, &report) {
        Ok(saved) => ApiResponse::ok(CreateReportResponse { saved, report }),
        Err(e) => {
            error!("Error saving report: {e:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to save report")
        }
    }
}

/// GET /api/reports - Saved reports, newest first
async fn list_reports(State(state): State<AppState>) -> Response {
    let conn = match lock_db(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match get_report_summaries(&conn) {
        Ok(summaries) => ApiResponse::ok(summaries),
        Err(e) => {
            error!("Error listing reports: {e:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to list reports")
        }
    }
}

/// GET /api/reports/:id - One saved report
async fn show_report(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let conn = match lock_db(&state) {
        Ok(conn) => conn,
        Err(response) => return response,
    };

    match get_report(&conn, &id) {
        Ok(Some(report)) => ApiResponse::ok(report),
        Ok(None) => error_response(StatusCode::NOT_FOUND, format!("report {id} not found")),
        Err(e) => {
            error!("Error getting report {id}: {e:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to load report")
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_path = std::env::var("MEMORIAL_DB").unwrap_or_else(|_| "memorials.db".to_string());
    let addr = std::env::var("MEMORIAL_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let config = match std::env::var("MEMORIAL_CONFIG") {
        Ok(path) => ValidatorConfig::from_file(&path)?,
        Err(_) => ValidatorConfig::default(),
    };

    let conn = Connection::open(&db_path)?;
    setup_database(&conn)?;
    info!(path = %db_path, "database opened");

    // Create shared state
    let state = AppState {
        db: Arc::new(Mutex::new(conn)),
        validator: Arc::new(DateConsistencyValidator::with_config(config)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/validate", post(validate_entry))
        .route("/reports", post(create_report).get(list_reports))
        .route("/reports/:id", get(show_report))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server running on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
