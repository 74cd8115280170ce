//! Shared loop-control state.
//!
//! [`LoopControl`] is the control plane the loop task and the command
//! handlers share: a running flag gating tick execution, a stop request
//! that tears the loop task down, and the runtime-adjustable tick
//! interval. All fields are atomics wrapped in [`Arc`](std::sync::Arc)
//! by the owner, so command handlers never block the loop's hot path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Notify;

/// Shared control state for the simulation loop.
#[derive(Debug)]
pub struct LoopControl {
    /// Whether ticks execute (toggled by the `toggle_game` command).
    running: AtomicBool,

    /// Whether the loop task has been asked to shut down.
    stop_requested: AtomicBool,

    /// Wakes the loop's inter-tick sleep so stop takes effect promptly.
    stop_notify: Notify,

    /// Real-time milliseconds between ticks (runtime adjustable).
    tick_interval_ms: AtomicU64,
}

impl LoopControl {
    /// Create control state with the given tick interval. The simulation
    /// starts in the not-running state.
    pub const fn new(tick_interval_ms: u64) -> Self {
        Self {
            running: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::const_new(),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
        }
    }

    /// Whether ticks currently execute.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Set the running flag.
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    /// Flip the running flag, returning the new state.
    pub fn toggle_running(&self) -> bool {
        !self.running.fetch_not(Ordering::AcqRel)
    }

    /// Current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Adjust the tick interval.
    pub fn set_tick_interval_ms(&self, interval_ms: u64) {
        self.tick_interval_ms.store(interval_ms, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Request loop shutdown and wake any in-flight sleep.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_waiters();
    }

    /// Clear a previous stop request (called before restarting the loop).
    pub fn clear_stop(&self) {
        self.stop_requested.store(false, Ordering::Release);
    }

    /// Resolve once a stop has been requested.
    ///
    /// The notified future is registered before the flag check, so a
    /// request landing between the check and the await is never missed.
    pub async fn stopped(&self) {
        loop {
            let notified = self.stop_notify.notified();
            if self.is_stop_requested() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn starts_stopped_and_not_running()  {
        let control = LoopControl::new(16);
        assert!(!control.is_running());
        assert!(!control.is_stop_requested());
        assert_eq!(control.tick_interval_ms(), 16);
    }

    #[test]
    fn toggle_flips_and_reports_new_state() {
        let control = LoopControl::new(16);
        assert!(control.toggle_running());
        assert!(control.is_running());
        assert!(!control.toggle_running());
        assert!(!control.is_running());
    }

    #[test]
    fn interval_is_adjustable() {
        let control = LoopControl::new(16);
        control.set_tick_interval_ms(250);
        assert_eq!(control.tick_interval_ms(), 250);
    }

    #[tokio::test]
    async fn stopped_resolves_after_request() {
        let control = Arc::new(LoopControl::new(16));

        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { control.stopped().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        control.request_stop();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn stopped_resolves_immediately_when_already_requested() {
        let control = LoopControl::new(16);
        control.request_stop();
        tokio::time::timeout(Duration::from_millis(100), control.stopped())
            .await
            .unwrap();
    }
}
