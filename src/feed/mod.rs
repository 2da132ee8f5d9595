//! Score feed contract and the NHL web API implementation.

pub mod error;
pub mod nhl;

use futures::future::BoxFuture;
use time::Date;

use crate::state::game::{GameId, GameSnapshot, ScheduledGame};

pub use self::error::{FeedError, FeedResult};

/// Abstraction over the data source that reports schedules and live scores.
pub trait ScoreSource: Send + Sync {
    /// Games scheduled on `date`.
    fn fetch_schedule(&self, date: Date) -> BoxFuture<'static, FeedResult<Vec<ScheduledGame>>>;
    /// Latest known state of one game.
    fn fetch_snapshot(&self, game_id: GameId) -> BoxFuture<'static, FeedResult<GameSnapshot>>;
}
