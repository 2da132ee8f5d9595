//! Turning today's schedule into the list of games to monitor.

use thiserror::Error;
use time::{OffsetDateTime, UtcOffset, macros::format_description};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::state::game::{GameId, GameTarget, LifecycleState, ScheduledGame};

/// Failures while reading the user's pick.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// A comma-separated entry was not a number.
    #[error("`{0}` is not a game number")]
    NotANumber(String),
    /// Every number was outside the listed range.
    #[error("no valid game numbers entered")]
    NoValidSelection,
    /// Reading stdin or writing the prompt failed.
    #[error("failed to interact with the terminal")]
    Io(#[from] std::io::Error),
}

/// Result alias for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The user entered `0`: stop without picking anything.
    Finished,
    /// Zero-based indices into the listed games, without duplicates.
    Picks(Vec<usize>),
}

/// Parse a comma-separated list of 1-based game numbers.
///
/// Out-of-range numbers are dropped; the line is rejected only if nothing
/// valid remains.
pub fn parse_selection(input: &str, available: usize) -> SelectionResult<Selection> {
    let input = input.trim();
    if input == "0" {
        return Ok(Selection::Finished);
    }

    let mut picks = Vec::new();
    for entry in input.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let number = entry
            .parse::<usize>()
            .map_err(|_| SelectionError::NotANumber(entry.to_string()))?;
        if (1..=available).contains(&number) && !picks.contains(&(number - 1)) {
            picks.push(number - 1);
        }
    }

    if picks.is_empty() {
        return Err(SelectionError::NoValidSelection);
    }
    Ok(Selection::Picks(picks))
}

/// Targets for the configured game ids, in schedule order.
///
/// Ids missing from today's schedule are logged and skipped.
pub fn select_configured(games: &[ScheduledGame], ids: &[GameId]) -> Vec<GameTarget> {
    for id in ids {
        if !games.iter().any(|game| game.target.id == *id) {
            warn!(game = id, "configured game is not on today's schedule");
        }
    }

    games
        .iter()
        .filter(|game| ids.contains(&game.target.id))
        .map(|game| game.target.clone())
        .collect()
}

/// List `games` on `output` and read picks from `input` until a valid line
/// (or `0`, or end of input) is entered. Start times are shown at `offset`.
pub async fn prompt<R, W>(
    games: &[ScheduledGame],
    input: R,
    mut output: W,
    offset: UtcOffset,
) -> SelectionResult<Vec<GameTarget>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if games.is_empty() {
        output.write_all(b"No games available to track.\n").await?;
        return Ok(Vec::new());
    }

    let mut listing = String::from("\nToday's games:\n--------------\n");
    for (index, game) in games.iter().enumerate() {
        listing.push_str(&format!(
            "{}. {} @ {}{} - Game ID: {}\n",
            index + 1,
            game.away_name,
            game.home_name,
            status_suffix(game, offset),
            game.target.id
        ));
    }
    output.write_all(listing.as_bytes()).await?;

    let mut lines = input.lines();
    loop {
        output
            .write_all(b"\nEnter the numbers of games to track (comma-separated, 0 to finish): ")
            .await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(Vec::new());
        };

        match parse_selection(&line, games.len()) {
            Ok(Selection::Finished) => return Ok(Vec::new()),
            Ok(Selection::Picks(picks)) => {
                let mut targets = Vec::with_capacity(picks.len());
                for index in picks {
                    let target = games[index].target.clone();
                    output
                        .write_all(
                            format!(
                                "Added: {} (starts at {})\n",
                                target.matchup(),
                                local_time(target.scheduled_start, offset)
                            )
                            .as_bytes(),
                        )
                        .await?;
                    targets.push(target);
                }
                return Ok(targets);
            }
            Err(err) => {
                output.write_all(format!("{err}. Please try again.\n").as_bytes()).await?;
            }
        }
    }
}

fn status_suffix(game: &ScheduledGame, offset: UtcOffset) -> String {
    match game.lifecycle_state {
        LifecycleState::Live => " (LIVE)".to_string(),
        LifecycleState::Final => " (FINAL)".to_string(),
        LifecycleState::Scheduled => {
            format!(" (starts at {})", local_time(game.target.scheduled_start, offset))
        }
    }
}

fn local_time(instant: OffsetDateTime, offset: UtcOffset) -> String {
    let format = format_description!("[hour repr:12]:[minute] [period]");
    instant
        .to_offset(offset)
        .format(&format)
        .unwrap_or_else(|_| instant.to_string())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn scheduled(id: GameId, away: &str, home: &str, state: LifecycleState) -> ScheduledGame {
        ScheduledGame {
            target: GameTarget {
                id,
                away_team: away.into(),
                home_team: home.into(),
                scheduled_start: datetime!(2024-11-02 23:00 UTC),
            },
            lifecycle_state: state,
            away_name: format!("{away} Away"),
            home_name: format!("{home} Home"),
        }
    }

    fn schedule() -> Vec<ScheduledGame> {
        vec![
            scheduled(100, "OTT", "CHI", LifecycleState::Scheduled),
            scheduled(101, "BOS", "TOR", LifecycleState::Live),
            scheduled(102, "SEA", "VAN", LifecycleState::Final),
        ]
    }

    #[test]
    fn parses_comma_separated_numbers() {
        assert_eq!(
            parse_selection(" 3, 1,,1 ", 3).unwrap(),
            Selection::Picks(vec![2, 0])
        );
    }

    #[test]
    fn out_of_range_numbers_are_dropped() {
        assert_eq!(parse_selection("2,9", 3).unwrap(), Selection::Picks(vec![1]));
        assert!(matches!(
            parse_selection("4,5", 3),
            Err(SelectionError::NoValidSelection)
        ));
        assert!(matches!(parse_selection("", 3), Err(SelectionError::NoValidSelection)));
    }

    #[test]
    fn zero_finishes_and_words_are_rejected() {
        assert_eq!(parse_selection("0", 3).unwrap(), Selection::Finished);
        assert!(matches!(
            parse_selection("1,two", 3),
            Err(SelectionError::NotANumber(entry)) if entry == "two"
        ));
    }

    #[test]
    fn configured_ids_follow_schedule_order() {
        let targets = select_configured(&schedule(), &[102, 999, 100]);
        let ids: Vec<_> = targets.iter().map(|target| target.id).collect();
        assert_eq!(ids, vec![100, 102]);
    }

    #[tokio::test]
    async fn prompt_retries_until_a_valid_line() {
        let games = schedule();
        let input: &[u8] = b"abc\n7\n2,3\n";
        let mut output = Vec::new();

        let targets = prompt(&games, input, &mut output, UtcOffset::UTC).await.unwrap();

        let ids: Vec<_> = targets.iter().map(|target| target.id).collect();
        assert_eq!(ids, vec![101, 102]);

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("1. OTT Away @ CHI Home (starts at"));
        assert!(transcript.contains("2. BOS Away @ TOR Home (LIVE) - Game ID: 101"));
        assert!(transcript.contains("`abc` is not a game number. Please try again."));
        assert!(transcript.contains("Added: SEA @ VAN"));
    }

    #[tokio::test]
    async fn prompt_ends_quietly_on_eof() {
        let games = schedule();
        let input: &[u8] = b"";
        let targets = prompt(&games, input, Vec::new(), UtcOffset::UTC).await.unwrap();
        assert!(targets.is_empty());
    }
}
