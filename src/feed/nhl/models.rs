use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    feed::error::FeedError,
    state::game::{GameSnapshot, GameTarget, LifecycleState, ScheduledGame},
};

/// `GET /schedule/{date}` payload. The feed returns the whole week.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    #[serde(default)]
    pub game_week: Vec<ScheduleDay>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleDay {
    pub date: String,
    #[serde(default)]
    pub games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub id: u64,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: String,
    #[serde(default)]
    pub game_state: String,
    pub away_team: ScheduleTeam,
    pub home_team: ScheduleTeam,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTeam {
    pub abbrev: String,
    #[serde(default)]
    pub place_name: Option<LocalizedName>,
    #[serde(default)]
    pub common_name: Option<LocalizedName>,
}

#[derive(Debug, Deserialize)]
pub struct LocalizedName {
    pub default: String,
}

impl ScheduleTeam {
    /// "Place Common" when both parts are present, otherwise the abbreviation.
    fn display_name(&self) -> String {
        match (&self.place_name, &self.common_name) {
            (Some(place), Some(common)) => format!("{} {}", place.default, common.default),
            (Some(place), None) => place.default.clone(),
            (None, Some(common)) => common.default.clone(),
            (None, None) => self.abbrev.clone(),
        }
    }
}

impl ScheduleResponse {
    /// Games of the day matching `date` (`YYYY-MM-DD`), ignoring the rest of the week.
    pub fn into_day(self, date: &str) -> Vec<ScheduleGame> {
        self.game_week
            .into_iter()
            .find(|day| day.date == date)
            .map(|day| day.games)
            .unwrap_or_default()
    }
}

impl TryFrom<ScheduleGame> for ScheduledGame {
    type Error = FeedError;

    fn try_from(game: ScheduleGame) -> Result<Self, Self::Error> {
        let scheduled_start = OffsetDateTime::parse(&game.start_time_utc, &Rfc3339).map_err(
            |source| FeedError::InvalidStartTime {
                game_id: game.id,
                value: game.start_time_utc.clone(),
                source,
            },
        )?;

        Ok(Self {
            away_name: game.away_team.display_name(),
            home_name: game.home_team.display_name(),
            lifecycle_state: LifecycleState::from_feed_state(&game.game_state),
            target: GameTarget {
                id: game.id,
                away_team: game.away_team.abbrev,
                home_team: game.home_team.abbrev,
                scheduled_start,
            },
        })
    }
}

/// `GET /gamecenter/{id}/boxscore` payload, reduced to what monitoring needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boxscore {
    #[serde(default)]
    pub game_state: String,
    pub away_team: BoxscoreTeam,
    pub home_team: BoxscoreTeam,
}

#[derive(Debug, Deserialize)]
pub struct BoxscoreTeam {
    pub abbrev: String,
    #[serde(default)]
    pub score: Option<u32>,
}

impl From<Boxscore> for GameSnapshot {
    fn from(value: Boxscore) -> Self {
        // Scores only count once both sides report one.
        let (away_score, home_score) = match value.away_team.score.zip(value.home_team.score) {
            Some((away, home)) => (Some(away), Some(home)),
            None => (None, None),
        };

        Self {
            away_team: value.away_team.abbrev,
            home_team: value.home_team.abbrev,
            lifecycle_state: LifecycleState::from_feed_state(&value.game_state),
            away_score,
            home_score,
        }
    }
}
