use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::{
    services::notifier,
    state::{
        SharedState,
        detector::{DeltaDetector, ScoreEvent},
        game::{GameId, GameTarget, Side},
    },
};

/// Where a monitor is in the life of its game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// Sleeping until the lead window before scheduled start.
    WaitingForWindow,
    /// Polling, no scores seen yet.
    WaitingForStart,
    /// Polling a game in progress.
    Live,
    /// Done; the task returns.
    Ended,
}

/// Result of a monitor that ran its game to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSummary {
    /// Game that was monitored.
    pub game_id: GameId,
    /// Goals detected (and flashed) while monitoring.
    pub goals: usize,
    /// Final `(away, home)` score, if the feed reported one.
    pub final_score: Option<(u32, u32)>,
}

/// Poll loop for a single game.
///
/// Owns its detector outright; the only thing shared with other monitors is
/// the [`SharedState`], and through it the notification gate.
pub struct GameMonitor {
    state: SharedState,
    target: GameTarget,
    detector: DeltaDetector,
    phase: MonitorPhase,
    goals: usize,
    final_score: Option<(u32, u32)>,
    announced_wait: bool,
}

impl GameMonitor {
    /// Prepare a monitor for `target`. Nothing happens until [`GameMonitor::run`].
    pub fn new(state: SharedState, target: GameTarget) -> Self {
        Self {
            state,
            target,
            detector: DeltaDetector::new(),
            phase: MonitorPhase::WaitingForWindow,
            goals: 0,
            final_score: None,
            announced_wait: false,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    /// Drive the game from the lead-window wait to the final whistle.
    pub async fn run(mut self) -> MonitorSummary {
        self.wait_for_window().await;

        let poll_interval = self.state.timings().poll_interval;
        while self.phase != MonitorPhase::Ended {
            let event = self.poll().await;
            self.handle(event).await;
            while let Some(event) = self.detector.take_pending() {
                self.handle(event).await;
            }
            if self.phase != MonitorPhase::Ended {
                sleep(poll_interval).await;
            }
        }

        MonitorSummary {
            game_id: self.target.id,
            goals: self.goals,
            final_score: self.final_score,
        }
    }

    async fn wait_for_window(&mut self) {
        let lead_window = self.state.timings().lead_window;
        let now = OffsetDateTime::now_utc();
        let until_start = self.target.scheduled_start - now;

        if until_start.is_positive() {
            info!(
                game = self.target.id,
                matchup = %self.target.matchup(),
                minutes = until_start.whole_minutes(),
                "game has not started yet"
            );
        }

        if let Some(delay) = window_delay(self.target.scheduled_start, now, lead_window) {
            sleep(delay).await;
            info!(
                game = self.target.id,
                matchup = %self.target.matchup(),
                "entering lead window; polling until the game starts"
            );
        }

        self.phase = MonitorPhase::WaitingForStart;
    }

    async fn poll(&mut self) -> ScoreEvent {
        match self.state.source().fetch_snapshot(self.target.id).await {
            Ok(snapshot) => self.detector.observe(&snapshot),
            Err(err) => {
                debug!(game = self.target.id, error = %err, "snapshot unavailable");
                self.detector.observe_unavailable()
            }
        }
    }

    async fn handle(&mut self, event: ScoreEvent) {
        let game = self.target.id;
        let away_team = self.target.away_team.as_str();
        let home_team = self.target.home_team.as_str();

        match event {
            ScoreEvent::NoChange => {
                if self.phase == MonitorPhase::WaitingForStart
                    && !self.announced_wait
                    && self.target.scheduled_start <= OffsetDateTime::now_utc()
                {
                    info!(game, matchup = %self.target.matchup(), "waiting for game to start");
                    self.announced_wait = true;
                }
            }
            ScoreEvent::GameStarted { away, home } => {
                info!(
                    game,
                    score = %format!("{away_team} {away} - {home_team} {home}"),
                    "game started"
                );
                self.phase = MonitorPhase::Live;
            }
            ScoreEvent::Goal {
                scorer,
                away,
                home,
            } => {
                let team = match scorer {
                    Side::Away => away_team,
                    Side::Home => home_team,
                };
                info!(
                    game,
                    team,
                    score = %format!("{away_team} {away} - {home_team} {home}"),
                    "GOAL"
                );
                self.goals += 1;
                let team = team.to_string();
                notifier::notify_goal(&self.state, &team).await;
            }
            ScoreEvent::GameEnded { final_score } => {
                match final_score {
                    Some((away, home)) => info!(
                        game,
                        score = %format!("{away_team} {away} - {home_team} {home}"),
                        "game has ended"
                    ),
                    None => info!(game, matchup = %self.target.matchup(), "game has ended"),
                }
                self.final_score = final_score;
                self.phase = MonitorPhase::Ended;
            }
        }
    }
}

/// How long to sleep before polling should begin, or `None` when already
/// inside the lead window (or past the start).
pub fn window_delay(
    scheduled_start: OffsetDateTime,
    now: OffsetDateTime,
    lead_window: Duration,
) -> Option<Duration> {
    let until_window = (scheduled_start - now) - lead_window;
    if until_window.is_positive() {
        Duration::try_from(until_window).ok()
    } else {
        None
    }
}
