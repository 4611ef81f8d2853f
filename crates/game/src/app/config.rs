use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::{LoopConfig, ScriptedInputEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub(crate) const CONFIG_ENV_VAR: &str = "SNAKEGAME_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    pub(crate) tile_size: i32,
    /// Units of progress per tick; a step commits every `tile_size / speed` ticks.
    pub(crate) speed: f32,
    pub(crate) dots_to_grow: u32,
    pub(crate) enemies_to_clear: u32,
    pub(crate) eat_effect_ticks: u64,
    pub(crate) exit_blink_ticks: u64,
    pub(crate) rng_seed: Option<u64>,
    pub(crate) target_tps: u32,
    pub(crate) realtime: bool,
    pub(crate) max_ticks: Option<u64>,
    pub(crate) levels: Vec<PathBuf>,
    pub(crate) input_script: Vec<ScriptedInputEvent>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 32,
            speed: 4.0,
            dots_to_grow: 5,
            enemies_to_clear: 5,
            eat_effect_ticks: 4,
            exit_blink_ticks: 10,
            rng_seed: None,
            target_tps: 60,
            realtime: true,
            max_ticks: None,
            levels: Vec::new(),
            input_script: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl GameConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size <= 0 {
            return Err(ConfigError::Invalid {
                field: "tile_size",
                reason: format!("must be positive, got {}", self.tile_size),
            });
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "speed",
                reason: format!("must be a positive number, got {}", self.speed),
            });
        }
        if self.speed > self.tile_size as f32 {
            return Err(ConfigError::Invalid {
                field: "speed",
                reason: format!(
                    "must not exceed tile_size {}, got {}",
                    self.tile_size, self.speed
                ),
            });
        }
        if self.dots_to_grow == 0 {
            return Err(ConfigError::Invalid {
                field: "dots_to_grow",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.realtime && self.max_ticks.is_none() {
            return Err(ConfigError::Invalid {
                field: "max_ticks",
                reason: "required when realtime is false".to_string(),
            });
        }
        if (self.tile_size as f32 % self.speed).abs() > f32::EPSILON {
            warn!(
                tile_size = self.tile_size,
                speed = self.speed,
                "speed does not divide tile_size; steps will drift against ticks"
            );
        }
        Ok(())
    }

    pub(crate) fn ticks_per_tile(&self) -> u32 {
        (self.tile_size as f32 / self.speed).ceil() as u32
    }

    pub(crate) fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            target_tps: self.target_tps,
            realtime: self.realtime,
            max_ticks: self.max_ticks,
            metrics_log_interval: Duration::from_secs(5),
            ..LoopConfig::default()
        }
    }
}

pub(crate) fn load_config_from_env() -> Result<GameConfig, ConfigError> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => load_config(Path::new(&path)),
        None => {
            let config = GameConfig::default();
            config.validate()?;
            Ok(config)
        }
    }
}

pub(crate) fn load_config(path: &Path) -> Result<GameConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&raw, path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(raw: &str, path: &Path) -> Result<GameConfig, ConfigError> {
    let deserializer = &mut serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(deserializer).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
