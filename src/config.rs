//! Session configuration: team defaults, clock durations and presentation flags.
//!
//! The configuration lives in a JSON file that is read once at start-up,
//! patched with command-line overrides and written back so the next session
//! starts from the same values.

use std::{
    env, fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::cli::Cli;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/scoreboard.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "SCOREBOARD_CONFIG_PATH";

/// Failure to persist the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The parent directory could not be created or the file could not be written.
    #[error("failed to write config `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The configuration could not be encoded.
    #[error("failed to encode config")]
    Encode(#[source] serde_json::Error),
}

/// Scoreboard configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreboardConfig {
    /// Name of the left team.
    pub team_a: String,
    /// Name of the right team.
    pub team_b: String,
    /// Display color of the left team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_a_color: Option<String>,
    /// Display color of the right team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_b_color: Option<String>,
    /// Game clock duration of a period, in seconds.
    pub game_seconds: u32,
    /// Shot clock duration, in seconds.
    pub shot_seconds: u32,
    /// Shortened shot clock reset (offensive rebound), in seconds.
    pub shot_reset_short_seconds: u32,
    /// Overtime game clock duration, in seconds.
    pub overtime_seconds: u32,
    /// Number of regular periods.
    pub period_max: u32,
    /// Timeouts granted to each team.
    pub timeouts_per_team: u32,
    /// Largest value the game clock may hold (99:59).
    pub game_clock_cap_seconds: u32,
    /// Largest value the shot clock may hold (two digits).
    pub shot_clock_cap_seconds: u32,
    /// Ticking cadence of the timing loop.
    pub tick_hz: u32,
    /// Minimum spacing of clock updates on the public stream while running.
    pub snapshot_interval_ms: u64,
    /// Debounce window for pushing scores to the live-score store.
    pub sync_interval_ms: u64,
    /// Presentation flags, stored for the display clients.
    pub windowed: bool,
    pub width: u32,
    pub height: u32,
    pub dual_monitor: bool,
    pub swap_monitors: bool,
    pub monitor_index: u32,
    pub team_swapped: bool,
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            team_a: "TEAM A".into(),
            team_b: "TEAM B".into(),
            team_a_color: None,
            team_b_color: None,
            game_seconds: 10 * 60,
            shot_seconds: 24,
            shot_reset_short_seconds: 14,
            overtime_seconds: 5 * 60,
            period_max: 4,
            timeouts_per_team: 3,
            game_clock_cap_seconds: 99 * 60 + 59,
            shot_clock_cap_seconds: 99,
            tick_hz: 60,
            snapshot_interval_ms: 100,
            sync_interval_ms: 1_000,
            windowed: false,
            width: 1920,
            height: 1080,
            dual_monitor: false,
            swap_monitors: false,
            monitor_index: 0,
            team_swapped: false,
        }
    }
}

impl ScoreboardConfig {
    /// Load the configuration from the resolved path, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&resolve_config_path())
    }

    /// Load the configuration from `path`. Missing or malformed files yield the
    /// built-in defaults; the result is always normalised.
    pub fn load_from(path: &Path) -> Self {
        let config = match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded scoreboard config");
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

        config.normalized()
    }

    /// Write the configuration to the resolved path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&resolve_config_path())
    }

    /// Write the configuration as pretty JSON to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Encode)?;

        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, contents).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(name) = cli.team_a.as_deref().filter(|name| !name.trim().is_empty()) {
            self.team_a = name.trim().to_string();
        }
        if let Some(name) = cli.team_b.as_deref().filter(|name| !name.trim().is_empty()) {
            self.team_b = name.trim().to_string();
        }
        if let Some(seconds) = cli.game {
            self.game_seconds = seconds;
        }
        if let Some(seconds) = cli.shot {
            self.shot_seconds = seconds;
        }
        if let Some(periods) = cli.periods {
            self.period_max = periods;
        }
        self.normalized()
    }

    /// Clamp durations and counts into usable ranges.
    fn normalized(mut self) -> Self {
        self.game_clock_cap_seconds = self.game_clock_cap_seconds.max(1);
        self.shot_clock_cap_seconds = self.shot_clock_cap_seconds.max(1);
        self.game_seconds = self.game_seconds.clamp(1, self.game_clock_cap_seconds);
        self.overtime_seconds = self.overtime_seconds.clamp(1, self.game_clock_cap_seconds);
        self.shot_seconds = self.shot_seconds.clamp(1, self.shot_clock_cap_seconds);
        self.shot_reset_short_seconds = self
            .shot_reset_short_seconds
            .clamp(1, self.shot_clock_cap_seconds);
        self.period_max = self.period_max.max(1);
        self.tick_hz = self.tick_hz.clamp(1, 1_000);
        self.snapshot_interval_ms = self.snapshot_interval_ms.max(1);
        self.sync_interval_ms = self.sync_interval_ms.max(1);
        self
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
