use std::collections::VecDeque;

use crate::state::game::{GameSnapshot, LifecycleState, Side};

/// Per-game bookkeeping owned by a single monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorState {
    /// Visiting score seen on the previous scored poll.
    pub last_away_score: Option<u32>,
    /// Home score seen on the previous scored poll.
    pub last_home_score: Option<u32>,
    /// Set once the first scored snapshot has been seen.
    pub started: bool,
    /// Set once the game is over; nothing changes after that.
    pub ended: bool,
}

/// Outcome of comparing a fresh snapshot against the previous state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreEvent {
    /// Nothing worth reacting to.
    NoChange,
    /// First snapshot carrying scores; these become the baseline.
    GameStarted {
        /// Visiting score at start.
        away: u32,
        /// Home score at start.
        home: u32,
    },
    /// A strictly increased score.
    Goal {
        /// Side whose score went up.
        scorer: Side,
        /// Visiting score after the goal.
        away: u32,
        /// Home score after the goal.
        home: u32,
    },
    /// The game is over. Scores are absent when the game ended unplayed.
    GameEnded {
        /// Final `(away, home)` score, if the feed reported one.
        final_score: Option<(u32, u32)>,
    },
}

/// Turns a sequence of snapshots for one game into [`ScoreEvent`]s.
///
/// A snapshot where both sides scored yields two goals: the away goal from
/// [`DeltaDetector::observe`] and the home goal from
/// [`DeltaDetector::take_pending`].
#[derive(Debug, Clone, Default)]
pub struct DeltaDetector {
    state: MonitorState,
    pending: VecDeque<ScoreEvent>,
}

impl DeltaDetector {
    /// Create a detector in the pre-start state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current bookkeeping.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Whether the game has been reported over.
    pub fn is_ended(&self) -> bool {
        self.state.ended
    }

    /// Feed a new snapshot and return the resulting event.
    pub fn observe(&mut self, snapshot: &GameSnapshot) -> ScoreEvent {
        let (next, event, extra) = detect(self.state, snapshot);
        self.state = next;
        self.pending.extend(extra);
        event
    }

    /// Next event produced by an earlier [`DeltaDetector::observe`] beyond the
    /// one it returned.
    pub fn take_pending(&mut self) -> Option<ScoreEvent> {
        self.pending.pop_front()
    }

    /// A poll that produced no snapshot. Never changes state.
    pub fn observe_unavailable(&self) -> ScoreEvent {
        ScoreEvent::NoChange
    }
}

fn detect(
    state: MonitorState,
    snapshot: &GameSnapshot,
) -> (MonitorState, ScoreEvent, Option<ScoreEvent>) {
    if state.ended {
        return (state, ScoreEvent::NoChange, None);
    }

    if snapshot.lifecycle_state == LifecycleState::Final {
        let next = MonitorState {
            ended: true,
            ..state
        };
        return (
            next,
            ScoreEvent::GameEnded {
                final_score: snapshot.scores(),
            },
            None,
        );
    }

    let Some((away, home)) = snapshot.scores() else {
        return (state, ScoreEvent::NoChange, None);
    };

    let next = MonitorState {
        last_away_score: Some(away),
        last_home_score: Some(home),
        started: true,
        ended: false,
    };

    if !state.started {
        return (next, ScoreEvent::GameStarted { away, home }, None);
    }

    // Decreases are feed corrections and compare as unchanged.
    let last_home = state.last_home_score.unwrap_or(home);
    let away_up = state.last_away_score.is_some_and(|last| away > last);
    let home_up = home > last_home;

    let home_goal = ScoreEvent::Goal {
        scorer: Side::Home,
        away,
        home,
    };
    match (away_up, home_up) {
        // Both scored between polls: away first, against the old home score.
        (true, true) => (
            next,
            ScoreEvent::Goal {
                scorer: Side::Away,
                away,
                home: last_home,
            },
            Some(home_goal),
        ),
        (true, false) => (
            next,
            ScoreEvent::Goal {
                scorer: Side::Away,
                away,
                home,
            },
            None,
        ),
        (false, true) => (next, home_goal, None),
        (false, false) => (next, ScoreEvent::NoChange, None),
    }
}
