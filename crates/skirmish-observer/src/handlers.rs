//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read the simulation under its coarse lock, matching the
//! tick-granularity exclusion discipline.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/state` | Full state update |
//! | `GET` | `/api/world` | Serialized world layout |
//! | `GET` | `/api/agents` | List live agents |
//! | `GET` | `/api/agents/{id}` | Single agent snapshot |
//! | `GET` | `/api/stats` | Team statistics |
//! | `GET` | `/api/behaviors` | Available behaviors |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use uuid::Uuid;

use skirmish_types::AgentId;

use crate::error::ObserverError;
use crate::state::AppState;

/// Serve a minimal HTML page showing server status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (tick, agents, walls) = {
        let sim = state.sim.lock().await;
        (sim.clock.tick(), sim.roster.len(), sim.arena.walls().len())
    };
    let running = if state.control.is_running() {
        "RUNNING"
    } else {
        "STOPPED"
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Skirmish Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        ul {{ list-style: none; padding: 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Skirmish Observer</h1>
    <p>Status: <span class="status">{running}</span></p>
    <div>
        <div class="metric"><div class="label">Tick</div><div class="value">{tick}</div></div>
        <div class="metric"><div class="label">Agents</div><div class="value">{agents}</div></div>
        <div class="metric"><div class="label">Walls</div><div class="value">{walls}</div></div>
    </div>
    <ul>
        <li>/api/state</li>
        <li>/api/world</li>
        <li>/api/agents</li>
        <li>/api/stats</li>
        <li>/api/behaviors</li>
        <li>/ws (WebSocket)</li>
    </ul>
</body>
</html>"#
    ))
}

/// `GET /api/state` -- the full state update payload.
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.full_state().await)
}

/// `GET /api/world` -- the serialized world layout.
pub async fn get_world(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sim = state.sim.lock().await;
    Json(sim.arena.snapshot())
}

/// `GET /api/agents` -- every live agent's snapshot.
pub async fn list_agents(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sim = state.sim.lock().await;
    let agents = sim.agent_snapshots();
    Json(serde_json::json!({
        "count": agents.len(),
        "agents": agents,
    }))
}

/// `GET /api/agents/{id}` -- one agent's snapshot.
pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let uuid: Uuid = id
        .parse()
        .map_err(|_| ObserverError::InvalidUuid(id.clone()))?;
    let agent_id = AgentId::from(uuid);

    let sim = state.sim.lock().await;
    sim.roster
        .get(&agent_id)
        .map(|agent| Json(agent.snapshot()))
        .ok_or_else(|| ObserverError::NotFound(format!("agent {agent_id}")))
}

/// `GET /api/stats` -- the aggregate team statistics.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sim = state.sim.lock().await;
    Json(sim.stats)
}

/// `GET /api/behaviors` -- built-in and custom behaviors.
pub async fn list_behaviors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let sim = state.sim.lock().await;
    Json(sim.behavior_system.available_behaviors())
}
