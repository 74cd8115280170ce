//! The inbound command surface.
//!
//! Clients drive the simulation over the `WebSocket` with JSON commands
//! tagged by `type`. Commands run to completion under the simulation
//! lock, so they never interleave with a half-finished tick. Invalid
//! input -- an unknown type, a malformed payload, a reference to a
//! missing agent -- is rejected with a logged warning and no state
//! mutation; nothing here can take the server down.

use serde::Deserialize;
use tracing::{info, warn};

use skirmish_agents::SteeringProgram;
use skirmish_core::config::AgentParameters;
use skirmish_types::snapshot::OutboundMessage;
use skirmish_types::{AgentId, BehaviorKind, Team, Vec2};

use crate::state::AppState;

/// A client command, tagged by `type` on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Toggle the running state of the simulation.
    ToggleGame,
    /// Spawn an agent, optionally at an explicit position.
    AddAgent {
        /// The team to spawn into.
        team: Team,
        /// Explicit spawn position; a wall-free position is sampled
        /// when absent.
        #[serde(default)]
        position: Option<Vec2>,
    },
    /// Force a built-in behavior onto an agent.
    ForceBehavior {
        /// The agent to override.
        agent_id: AgentId,
        /// The behavior to force.
        behavior: BehaviorKind,
    },
    /// Submit or replace a custom steering program for an agent.
    UpdateCustomBehavior {
        /// The agent the program drives.
        agent_id: AgentId,
        /// Program id; defaults to `custom-<agent_id>`.
        #[serde(default)]
        behavior_id: Option<String>,
        /// The steering program.
        program: SteeringProgram,
    },
    /// Request the list of available behaviors.
    FetchBehaviors,
    /// Apply new agent parameters.
    LoadConfig {
        /// The parameters to apply.
        parameters: AgentParameters,
    },
    /// Stop the loop, regenerate the world and roster, restart the loop.
    ResetGame,
}

/// Parse and execute one raw command frame.
///
/// Malformed JSON or an unknown command type is logged and dropped;
/// the connection stays open and no state changes.
pub async fn handle_text(state: &AppState, raw: &str) {
    match serde_json::from_str::<Command>(raw) {
        Ok(command) => handle(state, command).await,
        Err(error) => warn!(%error, "Rejected malformed command"),
    }
}

/// Execute one command.
pub async fn handle(state: &AppState, command: Command) {
    match command {
        Command::ToggleGame => {
            let running = state.control.toggle_running();
            info!(running, "Game state toggled");
            broadcast_full_state(state).await;
        }

        Command::AddAgent { team, position } => {
            {
                let mut sim = state.sim.lock().await;
                let _ = sim.spawn_agent(team, position);
            }
            broadcast_full_state(state).await;
        }

        Command::ForceBehavior { agent_id, behavior } => {
            let mut sim = state.sim.lock().await;
            let _ = sim.force_behavior(agent_id, behavior);
        }

        Command::UpdateCustomBehavior {
            agent_id,
            behavior_id,
            program,
        } => {
            let program_id = behavior_id.unwrap_or_else(|| format!("custom-{agent_id}"));
            let result = {
                let mut sim = state.sim.lock().await;
                sim.set_custom_behavior(agent_id, &program_id, program)
            };

            let (status, message) = match result {
                Ok(()) => (String::from("success"), None),
                Err(error) => {
                    warn!(%error, agent_id = %agent_id, "Custom behavior rejected");
                    (String::from("error"), Some(error.to_string()))
                }
            };
            let _ = state.broadcast(OutboundMessage::BehaviorUpdate {
                agent_id,
                status,
                message,
            });
        }

        Command::FetchBehaviors => {
            let behaviors = {
                let sim = state.sim.lock().await;
                sim.behavior_system.available_behaviors()
            };
            let _ = state.broadcast(OutboundMessage::BehaviorList { behaviors });
        }

        Command::LoadConfig { parameters } => {
            {
                let mut sim = state.sim.lock().await;
                sim.load_parameters(parameters);
            }
            broadcast_full_state(state).await;
        }

        Command::ResetGame => {
            state.stop_loop().await;
            {
                let mut sim = state.sim.lock().await;
                sim.reset();
            }
            state.start_loop().await;
            broadcast_full_state(state).await;
            info!("Game reset");
        }
    }
}

/// Broadcast the full state update to every client.
async fn broadcast_full_state(state: &AppState) {
    let full = state.full_state().await;
    let _ = state.broadcast(OutboundMessage::GameState(full));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use skirmish_core::config::{SimulationConfig, WorldSettings};
    use skirmish_core::SimulationState;

    use super::*;

    fn make_app_state() -> AppState {
        let config = SimulationConfig {
            world: WorldSettings {
                agents_per_team: 1,
                ..WorldSettings::default()
            },
            ..SimulationConfig::default()
        };
        AppState::new(SimulationState::new(config).unwrap())
    }

    #[tokio::test]
    async fn toggle_game_flips_running_and_broadcasts_state() {
        let state = make_app_state();
        let mut rx = state.subscribe();

        handle_text(&state, r#"{"type": "toggle_game"}"#).await;

        assert!(state.control.is_running());
        let message = rx.try_recv().unwrap();
        match message {
            OutboundMessage::GameState(full) => assert!(full.is_running),
            other => panic!("expected game_state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn add_agent_grows_the_roster() {
        let state = make_app_state();
        let before = state.sim.lock().await.roster.len();

        handle_text(&state, r#"{"type": "add_agent", "team": "red"}"#).await;

        assert_eq!(state.sim.lock().await.roster.len(), before + 1);
    }

    #[tokio::test]
    async fn add_agent_honors_explicit_position() {
        let state = make_app_state();

        handle_text(
            &state,
            r#"{"type": "add_agent", "team": "blue", "position": {"x": 123.0, "y": 45.0}}"#,
        )
        .await;

        let sim = state.sim.lock().await;
        let spawned = sim
            .roster
            .values()
            .find(|a| a.position() == Vec2::new(123.0, 45.0));
        assert!(spawned.is_some());
        assert_eq!(spawned.unwrap().team, Team::Blue);
    }

    #[tokio::test]
    async fn invalid_team_is_rejected_without_mutation() {
        let state = make_app_state();
        let before = state.sim.lock().await.roster.len();

        handle_text(&state, r#"{"type": "add_agent", "team": "green"}"#).await;

        assert_eq!(state.sim.lock().await.roster.len(), before);
    }

    #[tokio::test]
    async fn unknown_command_type_is_ignored() {
        let state = make_app_state();
        let before = state.sim.lock().await.roster.len();

        handle_text(&state, r#"{"type": "launch_missiles"}"#).await;
        handle_text(&state, "not even json").await;

        assert_eq!(state.sim.lock().await.roster.len(), before);
        assert!(!state.control.is_running());
    }

    #[tokio::test]
    async fn force_behavior_sets_override() {
        let state = make_app_state();
        let agent_id = *state.sim.lock().await.roster.keys().next().unwrap();

        let raw = format!(r#"{{"type": "force_behavior", "agent_id": "{agent_id}", "behavior": "flee"}}"#);
        handle_text(&state, &raw).await;

        let sim = state.sim.lock().await;
        assert_eq!(sim.behavior_system.assignments().len(), 1);
    }

    #[tokio::test]
    async fn custom_behavior_reports_success() {
        let state = make_app_state();
        let agent_id = *state.sim.lock().await.roster.keys().next().unwrap();
        let mut rx = state.subscribe();

        let raw = format!(
            r#"{{"type": "update_custom_behavior", "agent_id": "{agent_id}",
                 "program": {{"terms": [{{"term": {{"kind": "wander"}}, "weight": 1.0}}]}}}}"#
        );
        handle_text(&state, &raw).await;

        match rx.try_recv().unwrap() {
            OutboundMessage::BehaviorUpdate { status, .. } => assert_eq!(status, "success"),
            other => panic!("expected behavior_update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn custom_behavior_for_unknown_agent_reports_error() {
        let state = make_app_state();
        let ghost = AgentId::new();
        let mut rx = state.subscribe();

        let raw = format!(
            r#"{{"type": "update_custom_behavior", "agent_id": "{ghost}",
                 "program": {{"terms": [{{"term": {{"kind": "wander"}}, "weight": 1.0}}]}}}}"#
        );
        handle_text(&state, &raw).await;

        match rx.try_recv().unwrap() {
            OutboundMessage::BehaviorUpdate { status, message, .. } => {
                assert_eq!(status, "error");
                assert!(message.is_some());
            }
            other => panic!("expected behavior_update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_behaviors_broadcasts_the_list() {
        let state = make_app_state();
        let mut rx = state.subscribe();

        handle_text(&state, r#"{"type": "fetch_behaviors"}"#).await;

        match rx.try_recv().unwrap() {
            OutboundMessage::BehaviorList { behaviors } => {
                assert_eq!(behaviors.len(), 4);
            }
            other => panic!("expected behavior_list, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_config_applies_parameters() {
        let state = make_app_state();

        handle_text(
            &state,
            r#"{"type": "load_config", "parameters": {"baseHealth": 77.0}}"#,
        )
        .await;

        let sim = state.sim.lock().await;
        assert_eq!(sim.config.parameters.base_health, 77.0);
        for agent in sim.roster.values() {
            assert_eq!(agent.combat.max_health, 77.0);
        }
    }

    #[tokio::test]
    async fn reset_game_rebuilds_roster() {
        let state = make_app_state();
        {
            let mut sim = state.sim.lock().await;
            let ids: Vec<AgentId> = sim.roster.keys().copied().collect();
            for id in ids {
                if let Some(agent) = sim.roster.get_mut(&id) {
                    agent.combat.health = 1.0;
                }
            }
        }

        handle_text(&state, r#"{"type": "reset_game"}"#).await;

        let sim = state.sim.lock().await;
        assert_eq!(sim.roster.len(), 2);
        for agent in sim.roster.values() {
            assert_eq!(agent.combat.health, agent.combat.max_health);
        }
        // The reset restarted the loop task.
        drop(sim);
        assert!(state.game_loop.lock().await.is_started());
        state.stop_loop().await;
    }
}
