use axum::{
    extract::Query,
    http::{Method, StatusCode},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use hyper::Server;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::EventAgentError;
use crate::query::{self, EventQuery};
use crate::store::EventStore;
use crate::tool::{tool_declaration, ToolResult};

/// Health check endpoint
pub async fn health(Extension(store): Extension<Arc<EventStore>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "event-agent",
        "version": env!("CARGO_PKG_VERSION"),
        "events": store.len(),
    }))
}

/// Tool declaration for agent frameworks
pub async fn describe_tool() -> Json<Value> {
    Json(tool_declaration())
}

/// `GET /events`: run the query tool. Bad dates are reported as 400 so HTTP
/// clients can tell them apart from an empty search.
pub async fn get_events(
    Extension(store): Extension<Arc<EventStore>>,
    Query(params): Query<EventQuery>,
) -> (StatusCode, Json<ToolResult>) {
    match query::get_events(&store, &params) {
        Ok(outcome) => (StatusCode::OK, Json(outcome.into())),
        Err(e) => {
            let status = match e {
                EventAgentError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ToolResult::failed(&e)))
        }
    }
}

/// `POST /reload`: re-read the events file and swap the collection.
pub async fn reload(Extension(store): Extension<Arc<EventStore>>) -> Json<Value> {
    let count = tokio::task::spawn_blocking({
        let store = store.clone();
        move || store.reload()
    })
    .await
    .unwrap_or_else(|_| store.len());

    Json(json!({ "status": "reloaded", "events": count }))
}

/// Create the HTTP router over a shared store
pub fn create_server(store: Arc<EventStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/tool", get(describe_tool))
        .route("/events", get(get_events))
        .route("/reload", post(reload))
        .layer(Extension(store))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on `addr`
pub async fn start_server(store: Arc<EventStore>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_server(store);

    info!("HTTP server running on http://{}", addr);
    info!("Query tool:   http://{}/events?query=", addr);
    info!("Declaration:  http://{}/tool", addr);

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
