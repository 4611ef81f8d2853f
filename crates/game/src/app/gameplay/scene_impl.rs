use engine::{InputSnapshot, Scene, SceneCommand, SceneError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, trace};

use super::consumables::ConsumableKind;
use super::controller::{DeathCause, SnakeEvents, TickOutcome};
use super::level::Level;
use super::level_def::LevelLayout;
use crate::app::config::GameConfig;

const SCENE_NAME: &str = "snake";

#[derive(Debug, Error)]
#[error("no levels configured")]
struct NoLevels;

/// Collects one tick's worth of level events for the scene to act on.
#[derive(Debug, Default)]
struct LevelEvents {
    died: Option<DeathCause>,
    next_level: bool,
    eaten: u32,
}

impl SnakeEvents for LevelEvents {
    fn on_died(&mut self, cause: DeathCause) {
        self.died.get_or_insert(cause);
    }

    fn on_item_eaten(&mut self, _kind: ConsumableKind) {
        self.eaten += 1;
    }

    fn on_next_level(&mut self) {
        self.next_level = true;
    }
}

pub(crate) struct SnakeScene {
    config: GameConfig,
    levels: Vec<LevelLayout>,
    current: usize,
    level: Option<Level>,
    rng: StdRng,
    deaths: u32,
    total_score: u32,
}

impl SnakeScene {
    pub(crate) fn new(config: GameConfig, levels: Vec<LevelLayout>) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            levels,
            current: 0,
            level: None,
            rng,
            deaths: 0,
            total_score: 0,
        }
    }

    /// Replaces the running level. Returns false when `index` is past the
    /// last level.
    fn start_level(&mut self, index: usize) -> bool {
        if let Some(mut previous) = self.level.take() {
            previous.teardown();
        }
        let Some(layout) = self.levels.get(index) else {
            return false;
        };

        let level = Level::new(layout, &self.config, StdRng::seed_from_u64(self.rng.gen()));
        info!(
            index,
            level = level.name(),
            mode = ?level.mode(),
            segments = level.body().len(),
            items = level.consumables().len(),
            "level_loaded"
        );
        self.current = index;
        self.level = Some(level);
        true
    }
}

#[cfg(test)]
impl SnakeScene {
    pub(crate) fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub(crate) fn current_index(&self) -> usize {
        self.current
    }

    pub(crate) fn deaths(&self) -> u32 {
        self.deaths
    }

    pub(crate) fn total_score(&self) -> u32 {
        self.total_score
    }
}

impl Scene for SnakeScene {
    fn load(&mut self) -> Result<(), SceneError> {
        if self.levels.is_empty() {
            return Err(SceneError::Load {
                scene: SCENE_NAME.to_string(),
                source: Box::new(NoLevels),
            });
        }
        self.deaths = 0;
        self.total_score = 0;
        self.start_level(0);
        Ok(())
    }

    fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() {
            info!(scene = SCENE_NAME, "quit_requested");
            return SceneCommand::Quit;
        }
        let Some(level) = self.level.as_mut() else {
            return SceneCommand::Quit;
        };

        if input.pause_pressed() {
            let paused = level.toggle_pause();
            info!(level = level.name(), paused, "pause_toggled");
        }

        let mut events = LevelEvents::default();
        let outcome = level.tick(input, &mut events);
        if outcome == TickOutcome::Stepped {
            let body = level.body();
            let head = body.head().position;
            trace!(
                x = head.x,
                y = head.y,
                direction = ?body.direction(),
                previous_direction = ?body.last_direction(),
                segments = body.len(),
                eating = level.cosmetics().eating_head(),
                bulges = level.cosmetics().bulges().len(),
                "snake_stepped"
            );
        }
        if events.eaten > 0 {
            debug!(level = level.name(), score = level.score(), "score_updated");
        }

        if let Some(cause) = events.died {
            self.deaths += 1;
            info!(
                level = level.name(),
                ?cause,
                deaths = self.deaths,
                "level_restarted"
            );
            self.start_level(self.current);
        } else if events.next_level {
            self.total_score += level.score();
            if !self.start_level(self.current + 1) {
                info!(
                    total_score = self.total_score,
                    deaths = self.deaths,
                    "game_completed"
                );
                return SceneCommand::Quit;
            }
        }
        SceneCommand::None
    }

    fn unload(&mut self) {
        if let Some(mut level) = self.level.take() {
            level.set_paused(true);
            level.teardown();
        }
        info!(
            scene = SCENE_NAME,
            total_score = self.total_score,
            "scene_unloaded"
        );
    }

    fn debug_title(&self) -> Option<String> {
        let level = self.level.as_ref()?;
        let mut title = format!(
            "{} | score {} | length {} | enemies {}",
            level.name(),
            level.score(),
            level.body().len(),
            level.enemies_remaining()
        );
        if level.exit_unlocked() && level.cosmetics().exit_marker_visible() {
            title.push_str(" | exit ->");
        }
        if level.is_paused() {
            title.push_str(" | paused");
        }
        Some(title)
    }
}
