//! Server binary for the Skirmish simulation.
//!
//! Wires together the simulation core, the loop, and the observer API.
//! Loads configuration, builds the arena and the starting roster, starts
//! the observer server and the tick loop, and runs until interrupted.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `skirmish-config.yaml`
//! 3. Build the simulation state (arena + seeded teams)
//! 4. Start the Observer API server
//! 5. Start the tick loop
//! 6. Run until Ctrl-C, then stop the loop cleanly

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skirmish_core::{SimulationConfig, SimulationState};
use skirmish_observer::{spawn_server, AppState, ServerConfig};

/// Application entry point for the Skirmish engine.
///
/// # Errors
///
/// Returns an error if the simulation cannot be built or the observer
/// server cannot bind. Configuration problems are not fatal: the engine
/// falls back to built-in defaults.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("skirmish-engine starting");

    // 2. Load configuration.
    let config = load_config();
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        agents_per_team = config.world.agents_per_team,
        "Configuration loaded"
    );

    let observer_port = config.observer.port;

    // 3. Build the simulation state.
    let state = SimulationState::new(config)?;
    info!(
        walls = state.arena.walls().len(),
        agents = state.roster.len(),
        "Simulation state built"
    );

    let app_state = Arc::new(AppState::new(state));

    // 4. Start the Observer API server.
    let server_config = ServerConfig {
        host: String::from("0.0.0.0"),
        port: observer_port,
    };
    let _server_handle = spawn_server(&server_config, Arc::clone(&app_state)).await?;
    info!(port = observer_port, "Observer API server started");

    // 5. Start the tick loop.
    app_state.control.set_running(true);
    app_state.start_loop().await;
    info!("Simulation loop started");

    // 6. Run until interrupted.
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    app_state.stop_loop().await;
    info!("skirmish-engine shutdown complete");

    Ok(())
}

/// Load the simulation configuration from `skirmish-config.yaml`.
///
/// A missing or unreadable file is not fatal: the engine logs the
/// problem and runs with built-in defaults.
fn load_config() -> SimulationConfig {
    let config_path = Path::new("skirmish-config.yaml");
    if !config_path.exists() {
        info!("Config file not found, using defaults");
        return SimulationConfig::default();
    }

    match SimulationConfig::from_file(config_path) {
        Ok(config) => config,
        Err(error) => {
            warn!(%error, "Failed to load config, using defaults");
            SimulationConfig::default()
        }
    }
}
