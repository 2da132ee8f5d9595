//! Shared runtime state: game model, delta detection, team colors and the notification gate.

/// Team color pairs used for goal bursts.
pub mod colors;
/// Score delta detection between consecutive snapshots.
pub mod detector;
/// Game identity, lifecycle and snapshots.
pub mod game;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    config::Timings,
    device::{DeviceSnapshot, NotificationDevice},
    feed::ScoreSource,
};

use self::colors::{TeamColorPair, TeamColors};

/// Shared handle cloned into every monitor task.
pub type SharedState = Arc<AppState>;

/// Gate allowing a single notification burst at a time.
///
/// Waiters are served in the order they called [`NotificationGate::acquire`],
/// so a game that keeps scoring cannot starve the others.
#[derive(Debug, Default)]
pub struct NotificationGate {
    gate: Mutex<()>,
}

/// Proof of exclusive device access; dropping it releases the gate.
pub struct NotificationPermit<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl NotificationGate {
    /// Create an open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other burst holds the gate, then take it.
    pub async fn acquire(&self) -> NotificationPermit<'_> {
        NotificationPermit {
            _guard: self.gate.lock().await,
        }
    }
}

/// Process-wide state shared by every game monitor.
///
/// Everything here is fixed before the first monitor starts. The restore
/// snapshot in particular is captured once and never written again.
pub struct AppState {
    source: Arc<dyn ScoreSource>,
    device: Option<Arc<dyn NotificationDevice>>,
    restore_snapshot: DeviceSnapshot,
    colors: TeamColors,
    timings: Timings,
    notification_gate: NotificationGate,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(
        source: Arc<dyn ScoreSource>,
        device: Option<Arc<dyn NotificationDevice>>,
        restore_snapshot: DeviceSnapshot,
        colors: TeamColors,
        timings: Timings,
    ) -> SharedState {
        Arc::new(Self {
            source,
            device,
            restore_snapshot,
            colors,
            timings,
            notification_gate: NotificationGate::new(),
        })
    }

    /// Feed used to poll game snapshots.
    pub fn source(&self) -> &Arc<dyn ScoreSource> {
        &self.source
    }

    /// Notification device, absent when it could not be reached at startup.
    pub fn device(&self) -> Option<&Arc<dyn NotificationDevice>> {
        self.device.as_ref()
    }

    /// State every burst returns the device to.
    pub fn restore_snapshot(&self) -> &DeviceSnapshot {
        &self.restore_snapshot
    }

    /// Burst colors for a team code.
    pub fn team_colors(&self, team: &str) -> TeamColorPair {
        self.colors.lookup(team)
    }

    /// Poll, lead-window and burst timings.
    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Gate serializing access to the device.
    pub fn notification_gate(&self) -> &NotificationGate {
        &self.notification_gate
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex as StdMutex},
        time::Duration,
    };

    use tokio::time::{sleep, timeout};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn gate_admits_one_holder_at_a_time() {
        let gate = NotificationGate::new();

        let permit = gate.acquire().await;
        assert!(timeout(Duration::from_secs(1), gate.acquire()).await.is_err());

        drop(permit);
        assert!(timeout(Duration::from_secs(1), gate.acquire()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_waiter_is_served_before_a_later_request_from_the_holder() {
        let gate = Arc::new(NotificationGate::new());
        let order = Arc::new(StdMutex::new(Vec::new()));

        let take_turn = |name: &'static str| {
            let gate = Arc::clone(&gate);
            let order = Arc::clone(&order);
            async move {
                let _permit = gate.acquire().await;
                order.lock().unwrap().push(name);
                sleep(Duration::from_secs(1)).await;
            }
        };

        // Game A is mid-burst; game B queues, then A scores again.
        let held = gate.acquire().await;
        let other_game = tokio::spawn(take_turn("B"));
        sleep(Duration::from_millis(10)).await;
        let same_game_again = tokio::spawn(take_turn("A"));
        sleep(Duration::from_millis(10)).await;
        drop(held);

        other_game.await.unwrap();
        same_game_again.await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["B", "A"]);
    }
}
