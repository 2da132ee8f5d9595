use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    config::Timings,
    device::{DeviceSnapshot, NotificationDevice},
    state::{AppState, colors::TeamColorPair},
};

/// What happened during one burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurstReport {
    /// Color transitions attempted.
    pub transitions: usize,
    /// Transitions the device rejected or never acknowledged.
    pub failed_transitions: usize,
    /// Whether the final restore succeeded.
    pub restored: bool,
}

/// Number of color transitions a burst performs: `floor(duration / step)`.
pub fn transition_count(duration: Duration, step: Duration) -> usize {
    if step.is_zero() {
        return 0;
    }
    usize::try_from(duration.as_nanos() / step.as_nanos()).unwrap_or(usize::MAX)
}

/// Alternate `colors` on `device` for the burst duration, then restore `restore`.
///
/// The caller must hold the notification gate. Individual failures are
/// logged and skipped; the restore is always attempted.
pub async fn run_burst(
    device: &dyn NotificationDevice,
    colors: TeamColorPair,
    restore: DeviceSnapshot,
    timings: Timings,
) -> BurstReport {
    let transitions = transition_count(timings.burst_duration, timings.burst_step);
    let mut failed_transitions = 0;

    for step in 0..transitions {
        let color = if step % 2 == 0 {
            colors.primary
        } else {
            colors.secondary
        };

        if let Err(err) = device.set_color(color, timings.fade).await {
            failed_transitions += 1;
            warn!(step, error = %err, "color transition failed; continuing burst");
        }
        sleep(timings.burst_step).await;
    }

    let restored = match device.restore_state(restore).await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "failed to restore device state after burst");
            false
        }
    };

    BurstReport {
        transitions,
        failed_transitions,
        restored,
    }
}

/// Flash `team`'s colors once the device is free.
///
/// Waits its turn behind bursts already queued for other games. Without a
/// device the slot is still held for the burst duration so goal pacing does
/// not depend on whether the light is reachable.
pub async fn notify_goal(state: &AppState, team: &str) -> Option<BurstReport> {
    let colors = state.team_colors(team);
    let timings = state.timings();
    let _permit = state.notification_gate().acquire().await;

    let Some(device) = state.device() else {
        info!(team, "no notification device; goal not flashed");
        sleep(timings.burst_duration).await;
        return None;
    };

    info!(
        team,
        primary = ?colors.primary,
        secondary = ?colors.secondary,
        "flashing team colors"
    );
    let report = run_burst(device.as_ref(), colors, *state.restore_snapshot(), timings).await;
    if report.failed_transitions > 0 {
        warn!(
            team,
            failed = report.failed_transitions,
            total = report.transitions,
            "burst finished with failed transitions"
        );
    }
    Some(report)
}

/// Return the device to its captured state once no burst holds it.
///
/// Used on shutdown after the monitors have been aborted: waiting for the
/// gate keeps a burst's last color from landing after the restore.
pub async fn restore_device(state: &AppState) {
    let Some(device) = state.device() else {
        return;
    };

    let _permit = state.notification_gate().acquire().await;
    match device.restore_state(*state.restore_snapshot()).await {
        Ok(()) => info!("device state restored"),
        Err(err) => warn!(error = %err, "failed to restore device state"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;
    use crate::{
        device::Hsv,
        state::colors::{FALLBACK_COLORS, TeamColors},
        test_support::{DeviceCall, RecordingDevice, ScriptedSource, test_state, test_timings},
    };

    #[test]
    fn transition_count_floors() {
        let step = Duration::from_millis(500);
        assert_eq!(transition_count(Duration::from_secs(30), step), 60);
        assert_eq!(transition_count(Duration::from_millis(1_299), step), 2);
        assert_eq!(transition_count(Duration::from_millis(499), step), 0);
        assert_eq!(transition_count(Duration::from_secs(1), Duration::ZERO), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_alternates_colors_then_restores() {
        let device = RecordingDevice::new();
        let restore = DeviceSnapshot::default();
        let started = Instant::now();

        let report = run_burst(&device, FALLBACK_COLORS, restore, test_timings()).await;

        assert_eq!(
            report,
            BurstReport {
                transitions: 4,
                failed_transitions: 0,
                restored: true
            }
        );
        assert_eq!(
            device.calls(),
            vec![
                DeviceCall::SetColor(FALLBACK_COLORS.primary),
                DeviceCall::SetColor(FALLBACK_COLORS.secondary),
                DeviceCall::SetColor(FALLBACK_COLORS.primary),
                DeviceCall::SetColor(FALLBACK_COLORS.secondary),
                DeviceCall::Restore(restore),
            ]
        );
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_transition_does_not_abort_burst() {
        let device = RecordingDevice::failing_sets([1, 2]);

        let report = run_burst(
            &device,
            FALLBACK_COLORS,
            DeviceSnapshot::default(),
            test_timings(),
        )
        .await;

        assert_eq!(report.transitions, 4);
        assert_eq!(report.failed_transitions, 2);
        assert!(report.restored);
        assert!(matches!(
            device.calls().last(),
            Some(DeviceCall::Restore(_))
        ));
        assert_eq!(device.calls().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_goals_are_serialized_and_never_dropped() {
        let device = RecordingDevice::new();
        let state = test_state(ScriptedSource::new(), Some(device.clone()), test_timings());
        let started = Instant::now();

        let first = tokio::spawn({
            let state = Arc::clone(&state);
            async move { notify_goal(&state, "BOS").await }
        });
        let second = tokio::spawn({
            let state = Arc::clone(&state);
            async move { notify_goal(&state, "DAL").await }
        });

        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        assert!(first.is_some() && second.is_some());
        assert_eq!(started.elapsed(), Duration::from_secs(4));

        // Each burst is four sets followed by its restore, never interleaved.
        let calls = device.calls();
        assert_eq!(calls.len(), 10);
        for burst in calls.chunks(5) {
            assert!(matches!(burst[4], DeviceCall::Restore(_)));
            let colors: Vec<Hsv> = burst[..4]
                .iter()
                .map(|call| match call {
                    DeviceCall::SetColor(color) => *color,
                    other => panic!("unexpected call inside burst: {other:?}"),
                })
                .collect();
            assert!(colors[0] == colors[2] && colors[1] == colors[3]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waiting_game_goes_before_a_repeat_scorer() {
        let device = RecordingDevice::new();
        let state = test_state(ScriptedSource::new(), Some(device.clone()), test_timings());
        let colors = TeamColors::builtin();

        // BOS is mid-burst, DAL queues, then BOS scores again.
        let held = state.notification_gate().acquire().await;
        let dal = tokio::spawn({
            let state = Arc::clone(&state);
            async move { notify_goal(&state, "DAL").await }
        });
        sleep(Duration::from_millis(100)).await;
        let bos = tokio::spawn({
            let state = Arc::clone(&state);
            async move { notify_goal(&state, "BOS").await }
        });
        sleep(Duration::from_millis(100)).await;
        drop(held);

        assert!(dal.await.unwrap().is_some());
        assert!(bos.await.unwrap().is_some());

        let calls = device.calls();
        assert_eq!(calls.len(), 10);
        assert_eq!(calls[0], DeviceCall::SetColor(colors.lookup("DAL").primary));
        assert_eq!(calls[5], DeviceCall::SetColor(colors.lookup("BOS").primary));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_restore_lands_after_an_aborted_burst() {
        let device = RecordingDevice::new();
        let state = test_state(ScriptedSource::new(), Some(device.clone()), test_timings());

        let burst = tokio::spawn({
            let state = Arc::clone(&state);
            async move { notify_goal(&state, "BOS").await }
        });
        sleep(Duration::from_millis(700)).await;
        burst.abort();

        restore_device(&state).await;
        sleep(Duration::from_secs(5)).await;

        let calls = device.calls();
        assert_eq!(
            calls.iter().filter(|call| matches!(call, DeviceCall::SetColor(_))).count(),
            2
        );
        assert_eq!(calls.last(), Some(&DeviceCall::Restore(DeviceSnapshot::default())));
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn restore_without_device_is_a_no_op() {
        let state = test_state(ScriptedSource::new(), None, test_timings());
        restore_device(&state).await;
    }

    #[tokio::test(start_paused = true)]
    async fn missing_device_still_paces_goals() {
        let state = test_state(ScriptedSource::new(), None, test_timings());
        let started = Instant::now();

        assert_eq!(notify_goal(&state, "OTT").await, None);
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }
}
