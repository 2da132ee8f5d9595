use tokio::task::JoinSet;
use tracing::{error, info};

use crate::{
    services::monitor::{GameMonitor, MonitorSummary},
    state::{SharedState, game::GameTarget},
};

/// Monitor every target concurrently and wait until all of them have ended.
///
/// A monitor that panics is logged and left out of the returned summaries;
/// the remaining monitors keep running.
pub async fn run(state: SharedState, targets: Vec<GameTarget>) -> Vec<MonitorSummary> {
    let mut monitors = JoinSet::new();
    for target in targets {
        info!(game = target.id, matchup = %target.matchup(), "tracking game");
        monitors.spawn(GameMonitor::new(state.clone(), target).run());
    }

    let mut summaries = Vec::with_capacity(monitors.len());
    while let Some(result) = monitors.join_next().await {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(err) => error!(error = %err, "game monitor task failed"),
        }
    }

    info!(games = summaries.len(), "all monitored games have ended");
    summaries
}
