//! In-memory fakes of the feed and the device for async tests.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};

use futures::future::BoxFuture;
use reqwest::StatusCode;
use time::{Date, OffsetDateTime};
use tokio::time::Instant;

use crate::{
    config::Timings,
    device::{DeviceError, DeviceResult, DeviceSnapshot, Hsv, NotificationDevice},
    feed::{FeedError, FeedResult, ScoreSource},
    state::{
        AppState, SharedState,
        colors::TeamColors,
        game::{GameId, GameSnapshot, GameTarget, LifecycleState, ScheduledGame},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCall {
    SetColor(Hsv),
    Restore(DeviceSnapshot),
}

/// Device that records every call with its (virtual) timestamp.
#[derive(Clone, Default)]
pub struct RecordingDevice {
    calls: Arc<Mutex<Vec<(Instant, DeviceCall)>>>,
    failing_sets: Arc<HashSet<usize>>,
    sets_seen: Arc<Mutex<usize>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the n-th `set_color` calls (zero-based, counted across bursts).
    pub fn failing_sets(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            failing_sets: Arc::new(indices.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| *call)
            .collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, DeviceCall)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: DeviceCall) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }
}

impl NotificationDevice for RecordingDevice {
    fn capture_state(&self) -> BoxFuture<'static, DeviceResult<DeviceSnapshot>> {
        Box::pin(async { Ok(DeviceSnapshot::default()) })
    }

    fn set_color(&self, color: Hsv, _fade: Duration) -> BoxFuture<'static, DeviceResult<()>> {
        let device = self.clone();
        Box::pin(async move {
            device.record(DeviceCall::SetColor(color));
            let index = {
                let mut seen = device.sets_seen.lock().unwrap();
                let index = *seen;
                *seen += 1;
                index
            };
            if device.failing_sets.contains(&index) {
                Err(DeviceError::Timeout {
                    address: "test".into(),
                })
            } else {
                Ok(())
            }
        })
    }

    fn restore_state(&self, snapshot: DeviceSnapshot) -> BoxFuture<'static, DeviceResult<()>> {
        let device = self.clone();
        Box::pin(async move {
            device.record(DeviceCall::Restore(snapshot));
            Ok(())
        })
    }
}

/// Feed replaying a scripted list of polls per game. `None` entries are
/// fetch failures. Once a script runs out its last entry repeats.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    scripts: Arc<Mutex<HashMap<GameId, VecDeque<Option<GameSnapshot>>>>>,
    last: Arc<Mutex<HashMap<GameId, Option<GameSnapshot>>>>,
    fetches: Arc<Mutex<HashMap<GameId, usize>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, game_id: GameId, polls: Vec<Option<GameSnapshot>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(game_id, polls.into_iter().collect());
        self
    }

    pub fn fetches(&self, game_id: GameId) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .get(&game_id)
            .copied()
            .unwrap_or(0)
    }
}

impl ScoreSource for ScriptedSource {
    fn fetch_schedule(&self, _date: Date) -> BoxFuture<'static, FeedResult<Vec<ScheduledGame>>> {
        Box::pin(async { Ok(Vec::new()) })
    }

    fn fetch_snapshot(&self, game_id: GameId) -> BoxFuture<'static, FeedResult<GameSnapshot>> {
        let source = self.clone();
        Box::pin(async move {
            *source.fetches.lock().unwrap().entry(game_id).or_default() += 1;

            let next = source
                .scripts
                .lock()
                .unwrap()
                .get_mut(&game_id)
                .and_then(VecDeque::pop_front);
            let poll = match next {
                Some(poll) => {
                    source.last.lock().unwrap().insert(game_id, poll.clone());
                    poll
                }
                None => source.last.lock().unwrap().get(&game_id).cloned().flatten(),
            };

            poll.ok_or(FeedError::RequestStatus {
                path: format!("gamecenter/{game_id}/boxscore"),
                status: StatusCode::SERVICE_UNAVAILABLE,
            })
        })
    }
}

pub fn target(id: GameId, away: &str, home: &str) -> GameTarget {
    GameTarget {
        id,
        away_team: away.into(),
        home_team: home.into(),
        scheduled_start: OffsetDateTime::now_utc() - time::Duration::hours(1),
    }
}

pub fn snapshot(
    away: &str,
    home: &str,
    lifecycle_state: LifecycleState,
    scores: Option<(u32, u32)>,
) -> Option<GameSnapshot> {
    Some(GameSnapshot {
        away_team: away.into(),
        home_team: home.into(),
        lifecycle_state,
        away_score: scores.map(|(away, _)| away),
        home_score: scores.map(|(_, home)| home),
    })
}

/// Short timings so a burst is 4 transitions of 500ms.
pub fn test_timings() -> Timings {
    Timings {
        poll_interval: Duration::from_secs(1),
        lead_window: Duration::from_secs(300),
        burst_duration: Duration::from_secs(2),
        burst_step: Duration::from_millis(500),
        fade: Duration::from_millis(100),
    }
}

pub fn test_state(
    source: ScriptedSource,
    device: Option<RecordingDevice>,
    timings: Timings,
) -> SharedState {
    AppState::new(
        Arc::new(source),
        device.map(|device| Arc::new(device) as Arc<dyn NotificationDevice>),
        DeviceSnapshot::default(),
        TeamColors::builtin(),
        timings,
    )
}
