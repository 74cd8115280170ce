//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws` -- bidirectional `WebSocket` (stream out, commands in)
/// - `GET /api/state` -- full state update
/// - `GET /api/world` -- world layout
/// - `GET /api/agents` -- list agents
/// - `GET /api/agents/{id}` -- single agent
/// - `GET /api/stats` -- team statistics
/// - `GET /api/behaviors` -- available behaviors
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        // REST API
        .route("/api/state", get(handlers::get_state))
        .route("/api/world", get(handlers::get_world))
        .route("/api/agents", get(handlers::list_agents))
        .route("/api/agents/{id}", get(handlers::get_agent))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/behaviors", get(handlers::list_behaviors))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
