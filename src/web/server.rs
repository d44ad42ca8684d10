//! Axum HTTP server for the client info gateway.
//!
//! Serves the form pages (embedded static HTML) and the four CRUD
//! endpoints: submit, update, delete, search.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{delete, get, post},
};
use tokio::sync::oneshot;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::db::{ClientStore, display_client_name, normalize_client_name};
use crate::error::{DatabaseError, ServerError};
use crate::web::types::*;

/// Shared state for all gateway handlers.
pub struct GatewayState {
    /// Storage handle; injected so tests can substitute an in-memory store.
    pub store: Arc<dyn ClientStore>,
    /// Server startup time for uptime reporting.
    pub startup_time: Instant,
    /// Shutdown signal sender.
    pub shutdown_tx: tokio::sync::RwLock<Option<oneshot::Sender<()>>>,
}

impl GatewayState {
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self {
            store,
            startup_time: Instant::now(),
            shutdown_tx: tokio::sync::RwLock::new(None),
        }
    }
}

/// Start the gateway HTTP server.
///
/// Returns the actual bound `SocketAddr` (useful when binding to port 0).
pub async fn start_server(
    addr: SocketAddr,
    state: Arc<GatewayState>,
) -> Result<SocketAddr, ServerError> {
    let listener =
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::StartupFailed {
                reason: format!("failed to bind to {addr}: {e}"),
            })?;
    let bound_addr = listener
        .local_addr()
        .map_err(|e| ServerError::StartupFailed {
            reason: format!("failed to get local addr: {e}"),
        })?;

    let app = router(state.clone());

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    *state.shutdown_tx.write().await = Some(shutdown_tx);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("client info gateway shutting down");
            })
            .await
        {
            tracing::error!("client info gateway server error: {e}");
        }
    });

    Ok(bound_addr)
}

/// Build the full route table.
pub fn router(state: Arc<GatewayState>) -> Router {
    // Form pages, served from embedded strings
    let pages = Router::new()
        .route("/", get(index_page_handler))
        .route("/clientinfo", get(clientinfo_page_handler))
        .route("/updateclient", get(updateclient_page_handler))
        .route("/searchclient", get(searchclient_page_handler))
        .route("/deleteclient", get(deleteclient_page_handler))
        .route("/style.css", get(css_handler))
        .route("/app.js", get(js_handler));

    // CRUD endpoints
    let api = Router::new()
        .route("/submit-clientinfo", post(submit_client_handler))
        .route("/update-clientinfo", post(update_client_handler))
        .route("/delete-clientinfo", delete(delete_client_handler))
        .route("/search-clientinfo", post(search_client_handler))
        .route("/api/health", get(health_handler));

    Router::new()
        .merge(pages)
        .merge(api)
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            header::HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}

// --- Static page handlers ---

async fn index_page_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        include_str!("static/index.html"),
    )
}

async fn clientinfo_page_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        include_str!("static/clientinfo.html"),
    )
}

async fn updateclient_page_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        include_str!("static/updateclient.html"),
    )
}

async fn searchclient_page_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        include_str!("static/searchclient.html"),
    )
}

async fn deleteclient_page_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        include_str!("static/deleteclient.html"),
    )
}

async fn css_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        include_str!("static/style.css"),
    )
}

async fn js_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        include_str!("static/app.js"),
    )
}

// --- Health ---

async fn health_handler(State(state): State<Arc<GatewayState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        uptime_secs: state.startup_time.elapsed().as_secs(),
    })
}

// --- CRUD handlers ---

/// Presence check plus canonical form. Runs before any storage call; a
/// missing or blank name never reaches the store.
fn require_client_name(raw: Option<&str>) -> Result<String, (StatusCode, String)> {
    let name = raw.map(normalize_client_name).unwrap_or_default();
    if name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Client name is required.".to_string(),
        ));
    }
    Ok(name)
}

/// Log the real storage error, surface only the generic per-operation
/// message. No query text or driver detail crosses the HTTP boundary.
fn storage_failure(
    op: &'static str,
    public_message: &'static str,
    err: DatabaseError,
) -> (StatusCode, String) {
    tracing::error!("client info {op} failed: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, public_message.to_string())
}

async fn submit_client_handler(
    State(state): State<Arc<GatewayState>>,
    Form(form): Form<ClientInfoForm>,
) -> Result<&'static str, (StatusCode, String)> {
    let name = require_client_name(form.name.as_deref())?;
    let attrs = form.into_attributes();

    // The generated id comes back from the insert but is not exposed.
    let _id = state
        .store
        .insert_client_info(&name, &attrs)
        .await
        .map_err(|err| storage_failure("insert", "Error saving client information.", err))?;

    Ok("Client information submitted successfully.")
}

async fn update_client_handler(
    State(state): State<Arc<GatewayState>>,
    Form(form): Form<ClientInfoForm>,
) -> Result<&'static str, (StatusCode, String)> {
    let name = require_client_name(form.name.as_deref())?;
    let attrs = form.into_attributes();

    let updated = state
        .store
        .update_client_info(&name, &attrs)
        .await
        .map_err(|err| storage_failure("update", "Error updating client information.", err))?;

    if updated == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            "No client found with the specified name. Update failed.".to_string(),
        ));
    }
    Ok("Client record updated successfully.")
}

async fn delete_client_handler(
    State(state): State<Arc<GatewayState>>,
    Json(req): Json<ClientNameRequest>,
) -> Result<&'static str, (StatusCode, String)> {
    let name = require_client_name(req.name.as_deref())?;

    let deleted = state
        .store
        .delete_client_info(&name)
        .await
        .map_err(|err| storage_failure("delete", "Error deleting client information.", err))?;

    if deleted == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            "No client found with the specified name. Deletion failed.".to_string(),
        ));
    }
    Ok("Client record deleted successfully.")
}

async fn search_client_handler(
    State(state): State<Arc<GatewayState>>,
    Form(req): Form<ClientNameRequest>,
) -> Result<Json<ClientInfoResponse>, (StatusCode, String)> {
    let name = require_client_name(req.name.as_deref())?;

    let record = state
        .store
        .find_client_info(&name)
        .await
        .map_err(|err| storage_failure("search", "Error searching client information.", err))?
        .ok_or((
            StatusCode::NOT_FOUND,
            "No client found with the specified name.".to_string(),
        ))?;

    Ok(Json(ClientInfoResponse {
        name: display_client_name(&record.name),
        age: record.age,
        occupation: record.occupation,
        income: record.income,
        marital_status: record.marital_status,
        dependencies: record.dependencies,
        financial_goal: record.financial_goal,
    }))
}
