//! The async fixed-interval loop driving ticks and broadcasting updates.
//!
//! The loop task wakes at the configured interval and, while the running
//! flag is set, executes one tick under the shared simulation lock and
//! hands the resulting messages to the broadcast sink. A failed tick is
//! logged and followed by a one-second backoff -- the loop never
//! propagates tick errors to its owner. Stopping cancels the in-flight
//! sleep promptly and awaits the task, so no tick executes after
//! [`GameLoop::stop`] returns.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use skirmish_types::snapshot::{CombatEvent, GameUpdate, OutboundMessage};

use crate::clock::TickClock;
use crate::control::LoopControl;
use crate::tick::{SimulationState, TickSummary};

/// Backoff applied after a failed tick.
const TICK_ERROR_BACKOFF: Duration = Duration::from_secs(1);

/// The simulation behind its coarse lock.
///
/// The loop locks it for the duration of one tick body; command handlers
/// lock it for the duration of one command. Nothing else touches it.
pub type SharedSimulation = Arc<Mutex<SimulationState>>;

/// A sink for outbound messages, injected by the transport layer.
pub trait BroadcastSink: Send + 'static {
    /// Deliver one message to whatever transport is attached.
    fn deliver(&mut self, message: OutboundMessage);
}

/// A sink that discards everything (tests, headless runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl BroadcastSink for NullSink {
    fn deliver(&mut self, _message: OutboundMessage) {}
}

/// Owns the loop task and its control plane.
pub struct GameLoop {
    sim: SharedSimulation,
    control: Arc<LoopControl>,
    task: Option<JoinHandle<()>>,
}

impl GameLoop {
    /// Create a loop over the shared simulation. No task is spawned yet.
    pub const fn new(sim: SharedSimulation, control: Arc<LoopControl>) -> Self {
        Self {
            sim,
            control,
            task: None,
        }
    }

    /// The shared control plane.
    pub const fn control(&self) -> &Arc<LoopControl> {
        &self.control
    }

    /// The shared simulation.
    pub const fn simulation(&self) -> &SharedSimulation {
        &self.sim
    }

    /// Spawn the loop task. Idempotent: calling `start` while the task
    /// is alive is a no-op (the new sink is dropped).
    pub fn start(&mut self, sink: impl BroadcastSink) {
        if let Some(task) = &self.task {
            if !task.is_finished() {
                debug!("Game loop already running, start is a no-op");
                return;
            }
        }

        self.control.clear_stop();
        let sim = Arc::clone(&self.sim);
        let control = Arc::clone(&self.control);
        self.task = Some(tokio::spawn(run_loop(sim, control, sink)));
        info!("Game loop task started");
    }

    /// Whether the loop task is alive.
    pub fn is_started(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Request shutdown and await the task.
    ///
    /// The in-flight sleep (or backoff) is cancelled promptly; when this
    /// returns, no further tick will execute.
    pub async fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        self.control.request_stop();
        if let Err(error) = task.await {
            warn!(%error, "Game loop task ended abnormally");
        }
        info!("Game loop task stopped");
    }
}

/// The loop body: tick, broadcast, sleep, repeat.
async fn run_loop(
    sim: SharedSimulation,
    control: Arc<LoopControl>,
    mut sink: impl BroadcastSink,
) {
    info!("Game loop running");

    loop {
        if control.is_stop_requested() {
            break;
        }

        if control.is_running() {
            let messages = {
                let mut state = sim.lock().await;
                match state.run_tick() {
                    Ok(summary) => Some(build_messages(&mut state, &summary)),
                    Err(error) => {
                        error!(%error, "Tick failed");
                        None
                    }
                }
            };

            match messages {
                Some(messages) => {
                    for message in messages {
                        sink.deliver(message);
                    }
                }
                None => {
                    // Availability over crash: back off and keep going.
                    tokio::select! {
                        () = tokio::time::sleep(TICK_ERROR_BACKOFF) => {}
                        () = control.stopped() => break,
                    }
                    continue;
                }
            }
        }

        let interval = Duration::from_millis(control.tick_interval_ms());
        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            () = control.stopped() => break,
        }
    }

    info!("Game loop exited");
}

/// Assemble the tick's outbound messages: the per-tick game update, a
/// combat event when kills happened, and the synchronizer delta.
fn build_messages(state: &mut SimulationState, summary: &TickSummary) -> Vec<OutboundMessage> {
    let mut messages = vec![OutboundMessage::GameUpdate(GameUpdate {
        timestamp: TickClock::timestamp_ms(),
        agents: state.agent_snapshots(),
        stats: state.stats,
    })];

    if !summary.kills.is_empty() {
        messages.push(OutboundMessage::CombatEvent(CombatEvent {
            kills: summary.kills.clone(),
            stats: state.stats,
        }));
    }

    let delta = state.synchronizer.delta_update(&state.store);
    if !delta.is_empty() {
        messages.push(OutboundMessage::StateUpdate(delta));
    }

    messages
}
