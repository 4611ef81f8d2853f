use engine::{LoopConfig, Scene, ScriptedInput};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config_from_env, ConfigError, GameConfig};
use super::gameplay::{builtin_levels, load_level_def, LevelDefError, LevelLayout, SnakeScene};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
    pub(crate) input: ScriptedInput,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelDefError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Snake Startup ===");

    let config = load_config_from_env()?;
    let levels = load_levels(&config)?;
    info!(
        levels = levels.len(),
        tile_size = config.tile_size,
        speed = config.speed,
        ticks_per_tile = config.ticks_per_tile(),
        scripted_events = config.input_script.len(),
        "config_loaded"
    );

    let loop_config = config.loop_config();
    let input = ScriptedInput::new(config.input_script.clone());
    let scene = Box::new(SnakeScene::new(config, levels));

    Ok(AppWiring {
        config: loop_config,
        scene,
        input,
    })
}

fn load_levels(config: &GameConfig) -> Result<Vec<LevelLayout>, LevelDefError> {
    if config.levels.is_empty() {
        return builtin_levels();
    }
    config
        .levels
        .iter()
        .map(|path| load_level_def(path))
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
