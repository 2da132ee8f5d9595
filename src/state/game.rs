use time::OffsetDateTime;

/// Opaque identifier assigned to a game by the score feed.
pub type GameId = u64;

/// A game selected for monitoring.
///
/// Targets are built once during selection and handed to exactly one monitor,
/// which drops it when the game ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTarget {
    /// Feed identifier of the game.
    pub id: GameId,
    /// Abbreviated code of the visiting team (e.g. `OTT`).
    pub away_team: String,
    /// Abbreviated code of the home team.
    pub home_team: String,
    /// Scheduled puck drop.
    pub scheduled_start: OffsetDateTime,
}

impl GameTarget {
    /// Short `AWAY @ HOME` label used in log lines.
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}

/// Coarse lifecycle of a game as reported by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Not started yet (future or pre-game).
    Scheduled,
    /// In progress.
    Live,
    /// Over, or never going to be played.
    Final,
}

impl LifecycleState {
    /// Map the feed's raw `gameState` value onto a lifecycle.
    ///
    /// Postponed and cancelled games count as final so their monitors stop
    /// instead of polling a game that will not be played. Unrecognised values
    /// are treated as not started yet.
    pub fn from_feed_state(raw: &str) -> Self {
        match raw {
            "LIVE" | "CRIT" => LifecycleState::Live,
            "FINAL" | "OFF" | "PPD" | "CAN" => LifecycleState::Final,
            _ => LifecycleState::Scheduled,
        }
    }
}

/// Which side of a matchup scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Visiting team.
    Away,
    /// Home team.
    Home,
}

/// Point-in-time read of a game's state, fetched fresh on every poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Visiting team code.
    pub away_team: String,
    /// Home team code.
    pub home_team: String,
    /// Lifecycle reported by the feed.
    pub lifecycle_state: LifecycleState,
    /// Visiting team score, absent until play starts.
    pub away_score: Option<u32>,
    /// Home team score, absent until play starts.
    pub home_score: Option<u32>,
}

impl GameSnapshot {
    /// Both scores, or `None` when either side has not reported one yet.
    pub fn scores(&self) -> Option<(u32, u32)> {
        self.away_score.zip(self.home_score)
    }
}

/// One row of a day's schedule, as offered to the selection step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledGame {
    /// The monitoring target this row turns into when selected.
    pub target: GameTarget,
    /// Lifecycle at the time the schedule was fetched.
    pub lifecycle_state: LifecycleState,
    /// Full display name of the visiting team (e.g. "Ottawa Senators").
    pub away_name: String,
    /// Full display name of the home team.
    pub home_name: String,
}
