//! Application-level configuration loading: device address, feed endpoint, timings and team colors.

use std::{collections::HashMap, env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    device::{Hsv, kasa::KasaConfig},
    feed::nhl::NhlConfig,
    state::{colors::TeamColorPair, game::GameId},
};

/// Default location on disk where the binary looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/goal-light.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GOAL_LIGHT_CONFIG_PATH";
/// Environment variable that overrides the device address from the file.
const DEVICE_ADDR_ENV: &str = "GOAL_LIGHT_DEVICE_ADDR";
/// Environment variable that overrides the feed base URL from the file.
const FEED_URL_ENV: &str = "GOAL_LIGHT_FEED_URL";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_LEAD_WINDOW: Duration = Duration::from_secs(300);
const DEFAULT_BURST_DURATION: Duration = Duration::from_secs(30);
const DEFAULT_BURST_STEP: Duration = Duration::from_millis(500);
const DEFAULT_FADE: Duration = Duration::from_millis(100);

/// Every wait the monitors and bursts perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Delay between two polls of the same game.
    pub poll_interval: Duration,
    /// How long before scheduled start polling begins.
    pub lead_window: Duration,
    /// Total length of one goal burst.
    pub burst_duration: Duration,
    /// Time spent on each color within a burst.
    pub burst_step: Duration,
    /// Fade applied to each color transition.
    pub fade: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            lead_window: DEFAULT_LEAD_WINDOW,
            burst_duration: DEFAULT_BURST_DURATION,
            burst_step: DEFAULT_BURST_STEP,
            fade: DEFAULT_FADE,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Immutable runtime configuration resolved once at startup.
pub struct AppConfig {
    device: Option<KasaConfig>,
    feed: NhlConfig,
    timings: Timings,
    team_colors: Vec<(String, TeamColorPair)>,
    games: Vec<GameId>,
}

impl AppConfig {
    /// Load the configuration from disk and the environment, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_overrides(non_empty_env(DEVICE_ADDR_ENV), non_empty_env(FEED_URL_ENV))
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Replace the device address and feed URL when provided.
    pub fn with_overrides(mut self, device_address: Option<String>, feed_url: Option<String>) -> Self {
        if let Some(address) = device_address {
            let timeout = self
                .device
                .as_ref()
                .map(|device| device.command_timeout);
            let mut device = KasaConfig::new(address);
            if let Some(timeout) = timeout {
                device = device.with_timeout(timeout);
            }
            self.device = Some(device);
        }
        if let Some(url) = feed_url {
            self.feed.base_url = url;
        }
        self
    }

    /// How to reach the notification bulb, if one is configured.
    pub fn device(&self) -> Option<&KasaConfig> {
        self.device.as_ref()
    }

    /// How to reach the score feed.
    pub fn feed(&self) -> &NhlConfig {
        &self.feed
    }

    /// Poll, lead-window and burst timings.
    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Team color entries replacing or extending the built-in table.
    pub fn team_colors(&self) -> &[(String, TeamColorPair)] {
        &self.team_colors
    }

    /// Game ids to monitor without prompting. Empty means interactive selection.
    pub fn games(&self) -> &[GameId] {
        &self.games
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    device: RawDevice,
    feed: RawFeed,
    timings: RawTimings,
    team_colors: HashMap<String, RawColorPair>,
    games: Vec<GameId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDevice {
    address: Option<String>,
    command_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFeed {
    base_url: Option<String>,
    request_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTimings {
    poll_interval_ms: Option<u64>,
    lead_window_secs: Option<u64>,
    burst_duration_ms: Option<u64>,
    burst_step_ms: Option<u64>,
    fade_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
/// Colors as `[hue, saturation, value]` arrays.
struct RawColorPair {
    primary: [u16; 3],
    secondary: [u16; 3],
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let device = value
            .device
            .address
            .filter(|address| !address.trim().is_empty())
            .map(|address| {
                let config = KasaConfig::new(address);
                match positive_millis(value.device.command_timeout_ms) {
                    Some(timeout) => config.with_timeout(timeout),
                    None => config,
                }
            });

        let mut feed = NhlConfig::default();
        if let Some(url) = value.feed.base_url.filter(|url| !url.trim().is_empty()) {
            feed.base_url = url;
        }
        if let Some(timeout) = positive_millis(value.feed.request_timeout_ms) {
            feed.request_timeout = timeout;
        }

        let defaults = Timings::default();
        let raw = value.timings;
        let timings = Timings {
            poll_interval: positive_millis(raw.poll_interval_ms).unwrap_or(defaults.poll_interval),
            lead_window: raw
                .lead_window_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.lead_window),
            burst_duration: raw
                .burst_duration_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.burst_duration),
            burst_step: positive_millis(raw.burst_step_ms).unwrap_or(defaults.burst_step),
            fade: raw.fade_ms.map(Duration::from_millis).unwrap_or(defaults.fade),
        };

        let mut team_colors = value
            .team_colors
            .into_iter()
            .map(|(code, pair)| (code, pair.into()))
            .collect::<Vec<_>>();
        team_colors.sort_by(|(a, _), (b, _)| a.cmp(b));

        Self {
            device,
            feed,
            timings,
            team_colors,
            games: value.games,
        }
    }
}

impl From<RawColorPair> for TeamColorPair {
    fn from(value: RawColorPair) -> Self {
        Self::new(hsv_from_array(value.primary), hsv_from_array(value.secondary))
    }
}

fn hsv_from_array([hue, saturation, value]: [u16; 3]) -> Hsv {
    let percent = |component: u16| component.min(100) as u8;
    Hsv::new(hue, percent(saturation), percent(value))
}

fn positive_millis(value: Option<u64>) -> Option<Duration> {
    value.filter(|ms| *ms > 0).map(Duration::from_millis)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
