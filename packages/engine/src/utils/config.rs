// packages/engine/src/utils/config.rs
//! Engine configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `VICTROLA__*` environment variables.

use crate::effects::ripple::RippleConfig;
use crate::playback::label::LabelMode;
use crate::recording::event_log::{FilterPolicy, DEFAULT_SLACK_MS};
use crate::utils::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default configuration file looked up in the working directory
const DEFAULT_CONFIG_NAME: &str = "victrola";

/// Environment variable prefix
const ENV_PREFIX: &str = "VICTROLA";

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub timeline: TimelineConfig,
    pub playback: PlaybackConfig,
    pub effects: EffectsConfig,
    pub log: LogConfig,
}

/// Timeline bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Slack added past the last event so it stays reachable (ms)
    pub slack_ms: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            slack_ms: DEFAULT_SLACK_MS,
        }
    }
}

/// Playback clock settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Speed multiplier applied to wall-clock time
    pub speed: f64,

    /// Frame callback interval for the driver (milliseconds)
    pub frame_interval_ms: u64,

    /// How the seek label is rendered
    pub label_mode: LabelMode,

    /// Deep-link start time in seconds
    pub initial_time_secs: Option<f64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            frame_interval_ms: 16,
            label_mode: LabelMode::Elapsed,
            initial_time_secs: None,
        }
    }
}

/// Derived visual effect settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub ripple_duration_ms: f64,
    pub ripple_radius: f64,
    pub ripple_max_width: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        let ripple = RippleConfig::default();
        Self {
            ripple_duration_ms: ripple.duration_ms,
            ripple_radius: ripple.radius,
            ripple_max_width: ripple.max_width,
        }
    }
}

impl EffectsConfig {
    pub fn ripple(&self) -> RippleConfig {
        RippleConfig {
            duration_ms: self.ripple_duration_ms,
            radius: self.ripple_radius,
            max_width: self.ripple_max_width,
        }
    }
}

/// Event log settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: FilterPolicy,
}

impl EngineConfig {
    /// Load configuration from `victrola.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default file when given
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: EngineConfig = settings.try_deserialize()?;
        config.validate()?;

        debug!("Loaded engine configuration: {:?}", config);
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.playback.speed.is_finite() && self.playback.speed > 0.0) {
            return Err(EngineError::InvalidSpeed(self.playback.speed));
        }
        if self.playback.frame_interval_ms == 0 {
            return Err(EngineError::ConfigError(
                "playback.frame_interval_ms must be positive".to_string(),
            ));
        }
        if !(self.timeline.slack_ms.is_finite() && self.timeline.slack_ms >= 0.0) {
            return Err(EngineError::ConfigError(format!(
                "timeline.slack_ms must be non-negative, got {}",
                self.timeline.slack_ms
            )));
        }
        if !(self.effects.ripple_duration_ms.is_finite() && self.effects.ripple_duration_ms > 0.0)
        {
            return Err(EngineError::ConfigError(format!(
                "effects.ripple_duration_ms must be positive, got {}",
                self.effects.ripple_duration_ms
            )));
        }
        Ok(())
    }
}
