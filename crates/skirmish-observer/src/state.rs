//! Shared application state for the Observer API server.
//!
//! [`AppState`] ties the transport to the core: the simulation behind
//! its coarse lock, the loop control plane, the loop task handle, and
//! the broadcast channel fanning outbound messages to every connected
//! `WebSocket` client.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use skirmish_core::runner::{BroadcastSink, GameLoop, SharedSimulation};
use skirmish_core::{LoopControl, SimulationState};
use skirmish_types::snapshot::{FullState, OutboundMessage};

/// Capacity of the broadcast channel for outbound messages.
///
/// A subscriber that falls behind by more than this many messages
/// receives a `Lagged` error and resumes from the newest message.
const BROADCAST_CAPACITY: usize = 256;

/// A [`BroadcastSink`] pushing loop output into the broadcast channel.
///
/// Sending into a channel with zero receivers is normal (no clients
/// connected) and is not an error.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: broadcast::Sender<OutboundMessage>,
}

impl BroadcastSink for ChannelSink {
    fn deliver(&mut self, message: OutboundMessage) {
        let _ = self.tx.send(message);
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The simulation behind its coarse lock.
    pub sim: SharedSimulation,
    /// The loop control plane (running flag, stop request, interval).
    pub control: Arc<LoopControl>,
    /// The loop task owner (locked by lifecycle commands).
    pub game_loop: Arc<Mutex<GameLoop>>,
    /// Broadcast sender for outbound messages.
    tx: broadcast::Sender<OutboundMessage>,
}

impl AppState {
    /// Wrap a freshly built simulation in the shared transport state.
    pub fn new(state: SimulationState) -> Self {
        let control = Arc::new(LoopControl::new(state.config.world.tick_interval_ms));
        let sim: SharedSimulation = Arc::new(Mutex::new(state));
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let game_loop = GameLoop::new(Arc::clone(&sim), Arc::clone(&control));

        Self {
            sim,
            control,
            game_loop: Arc::new(Mutex::new(game_loop)),
            tx,
        }
    }

    /// Build a sink feeding this state's broadcast channel.
    pub fn sink(&self) -> ChannelSink {
        ChannelSink {
            tx: self.tx.clone(),
        }
    }

    /// Subscribe to the outbound message stream.
    pub fn subscribe(&self) -> broadcast::Receiver<OutboundMessage> {
        self.tx.subscribe()
    }

    /// Publish a message to all connected clients.
    ///
    /// Returns the number of receivers that got the message; 0 when no
    /// client is connected, which is not an error.
    pub fn broadcast(&self, message: OutboundMessage) -> usize {
        self.tx.send(message).unwrap_or(0)
    }

    /// Spawn the loop task (no-op when already alive).
    pub async fn start_loop(&self) {
        self.game_loop.lock().await.start(self.sink());
    }

    /// Stop the loop task and await its completion.
    pub async fn stop_loop(&self) {
        self.game_loop.lock().await.stop().await;
    }

    /// Snapshot the full state update under the simulation lock.
    pub async fn full_state(&self) -> FullState {
        let sim = self.sim.lock().await;
        sim.full_state(self.control.is_running())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skirmish_core::config::{SimulationConfig, WorldSettings};
    use skirmish_types::snapshot::{CombatEvent, TeamStats};

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
    async fn broadcast_without_subscribers_reports_zero() {
        let state = make_app_state();
        let sent = state.broadcast(OutboundMessage::CombatEvent(CombatEvent {
            kills: Vec::new(),
            stats: TeamStats::default(),
        }));
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn subscribers_receive_broadcasts() {
        let state = make_app_state();
        let mut rx = state.subscribe();

        let sent = state.broadcast(OutboundMessage::CombatEvent(CombatEvent {
            kills: Vec::new(),
            stats: TeamStats::default(),
        }));
        assert_eq!(sent, 1);

        let received = rx.recv().await.unwrap();
        assert!(matches!(received, OutboundMessage::CombatEvent(_)));
    }

    #[tokio::test]
    async fn sink_feeds_the_broadcast_channel() {
        let state = make_app_state();
        let mut rx = state.subscribe();
        let mut sink = state.sink();

        sink.deliver(OutboundMessage::CombatEvent(CombatEvent {
            kills: Vec::new(),
            stats: TeamStats::default(),
        }));

        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn full_state_reflects_running_flag() {
        let state = make_app_state();
        assert!(!state.full_state().await.is_running);

        state.control.set_running(true);
        assert!(state.full_state().await.is_running);
    }
}
