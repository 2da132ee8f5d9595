//! Long-running behavior built on top of [`crate::state`].

/// Per-game poll loop driving the delta detector.
pub mod monitor;
/// Goal bursts on the shared notification device.
pub mod notifier;
/// Concurrent start-up and completion of every game monitor.
pub mod orchestrator;
/// Choosing which of today's games to monitor.
pub mod selection;
