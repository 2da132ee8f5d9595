use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::de::DeserializeOwned;
use time::{Date, macros::format_description};
use tracing::warn;

use crate::{
    feed::{
        ScoreSource,
        error::{FeedError, FeedResult},
    },
    state::game::{GameId, GameSnapshot, ScheduledGame},
};

use super::{
    config::NhlConfig,
    models::{Boxscore, ScheduleResponse},
};

/// Score feed backed by the public NHL web API.
#[derive(Clone)]
pub struct NhlFeed {
    client: Client,
    base_url: Arc<str>,
}

impl NhlFeed {
    /// Build the HTTP client. No request is made until the first fetch.
    pub fn new(config: NhlConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| FeedError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
        })
    }

    async fn get_json<T>(&self, path: &str) -> FeedResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|source| FeedError::RequestSend {
                    path: path.to_string(),
                    source,
                })?;

        if !response.status().is_success() {
            return Err(FeedError::RequestStatus {
                path: path.to_string(),
                status: response.status(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| FeedError::DecodeResponse {
                path: path.to_string(),
                source,
            })
    }
}

/// `YYYY-MM-DD`, the date format used in feed paths and schedule rows.
pub fn feed_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format)
        .unwrap_or_else(|_| format!("{}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day()))
}

impl ScoreSource for NhlFeed {
    fn fetch_schedule(&self, date: Date) -> BoxFuture<'static, FeedResult<Vec<ScheduledGame>>> {
        let feed = self.clone();
        Box::pin(async move {
            let day = feed_date(date);
            let payload: ScheduleResponse = feed.get_json(&format!("schedule/{day}")).await?;

            let mut games = Vec::new();
            for game in payload.into_day(&day) {
                let game_id = game.id;
                match ScheduledGame::try_from(game) {
                    Ok(scheduled) => games.push(scheduled),
                    Err(err) => warn!(game = game_id, error = %err, "skipping unreadable schedule entry"),
                }
            }
            Ok(games)
        })
    }

    fn fetch_snapshot(&self, game_id: GameId) -> BoxFuture<'static, FeedResult<GameSnapshot>> {
        let feed = self.clone();
        Box::pin(async move {
            let boxscore: Boxscore = feed
                .get_json(&format!("gamecenter/{game_id}/boxscore"))
                .await?;
            Ok(boxscore.into())
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn feed_date_is_zero_padded() {
        assert_eq!(feed_date(date!(2024 - 03 - 07)), "2024-03-07");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let feed = NhlFeed::new(NhlConfig::new("https://example.test/v1/")).unwrap();
        assert_eq!(&*feed.base_url, "https://example.test/v1");
    }
}
