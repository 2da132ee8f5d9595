//! goal-light binary entrypoint: pick today's games, watch them, flash the bulb on goals.

use std::sync::Arc;

use anyhow::Context;
use time::{OffsetDateTime, UtcOffset};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use goal_light::{
    config::AppConfig,
    device::{
        DeviceSnapshot, NotificationDevice,
        kasa::{KasaBulb, KasaConfig},
    },
    feed::{
        ScoreSource,
        nhl::{NhlFeed, feed_date},
    },
    services::{notifier, orchestrator, selection},
    state::{AppState, colors::TeamColors, game::GameTarget},
};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // The local offset can only be read while the process is single-threaded.
    let offset = UtcOffset::current_local_offset().unwrap_or_else(|_| {
        warn!("could not determine local UTC offset; using UTC for dates");
        UtcOffset::UTC
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?
        .block_on(run(offset))
}

async fn run(offset: UtcOffset) -> anyhow::Result<()> {
    let config = AppConfig::load();

    let feed = NhlFeed::new(config.feed().clone()).context("building score feed client")?;

    let today = OffsetDateTime::now_utc().to_offset(offset).date();
    info!(date = %feed_date(today), "fetching today's games");
    let schedule = match feed.fetch_schedule(today).await {
        Ok(games) => games,
        Err(err) => {
            warn!(error = %err, "failed to fetch today's schedule");
            Vec::new()
        }
    };
    if schedule.is_empty() {
        info!(date = %feed_date(today), "no games scheduled; exiting");
        return Ok(());
    }

    let targets = select_targets(&config, &schedule, offset).await?;
    if targets.is_empty() {
        info!("no games selected; exiting");
        return Ok(());
    }

    let (device, restore_snapshot) = connect_device(config.device()).await;
    let colors = TeamColors::with_overrides(config.team_colors().iter().cloned());
    let state = AppState::new(
        Arc::new(feed),
        device,
        restore_snapshot,
        colors,
        config.timings(),
    );

    info!(games = targets.len(), "tracking games");
    tokio::select! {
        _ = orchestrator::run(state.clone(), targets) => {}
        _ = shutdown_signal() => {
            warn!("shutdown requested; restoring device state");
            notifier::restore_device(&state).await;
        }
    }

    Ok(())
}

/// Use the configured game ids when present, otherwise ask on the terminal.
async fn select_targets(
    config: &AppConfig,
    schedule: &[goal_light::state::game::ScheduledGame],
    offset: UtcOffset,
) -> anyhow::Result<Vec<GameTarget>> {
    if !config.games().is_empty() {
        return Ok(selection::select_configured(schedule, config.games()));
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    selection::prompt(schedule, stdin, tokio::io::stdout(), offset)
        .await
        .context("reading game selection")
}

/// Reach the bulb and capture the state bursts restore to.
///
/// Neither step is fatal: without a device goals are only logged, and
/// without a capture the default warm white is restored instead.
async fn connect_device(
    config: Option<&KasaConfig>,
) -> (Option<Arc<dyn NotificationDevice>>, DeviceSnapshot) {
    let Some(config) = config else {
        warn!("no notification device configured; goals will only be logged");
        return (None, DeviceSnapshot::default());
    };

    let bulb = match KasaBulb::connect(config.clone()).await {
        Ok(bulb) => bulb,
        Err(err) => {
            warn!(error = %err, "cannot reach notification device; goals will only be logged");
            return (None, DeviceSnapshot::default());
        }
    };

    let snapshot = match bulb.capture_state().await {
        Ok(snapshot) => {
            info!(?snapshot, "captured device state");
            snapshot
        }
        Err(err) => {
            warn!(
                error = %err,
                "failed to capture device state; restoring to default warm white after bursts"
            );
            DeviceSnapshot::default()
        }
    };

    (Some(Arc::new(bulb)), snapshot)
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; listening for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
