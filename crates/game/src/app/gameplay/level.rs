use engine::InputSnapshot;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use super::body::{Point, SnakeBody};
use super::collision::TileCollision;
use super::consumables::{Consumable, ConsumableTracker};
use super::controller::{
    DeathCause, MovementController, MovementMode, MovementSettings, SnakeEvents, TickOutcome,
};
use super::cosmetics::EatCosmetics;
use super::direction::Direction;
use super::level_def::LevelLayout;
use crate::app::config::GameConfig;

/// One running level: the body, its controller, items and the exit gate.
#[derive(Debug)]
pub(crate) struct Level {
    name: String,
    mode: MovementMode,
    body: SnakeBody,
    controller: MovementController,
    collision: TileCollision,
    consumables: Vec<Consumable>,
    tracker: ConsumableTracker,
    cosmetics: EatCosmetics,
    rng: StdRng,
    tile_size: i32,
    level_width: i32,
    level_height: i32,
    score: u32,
    paused: bool,
    torn_down: bool,
    exit_run_started: bool,
    exit_fired: bool,
}

impl Level {
    pub(crate) fn new(layout: &LevelLayout, config: &GameConfig, rng: StdRng) -> Self {
        let tile_size = config.tile_size;
        let to_world = |tile: Point| Point::new(tile.x * tile_size, tile.y * tile_size);

        let collision = TileCollision::new(layout.tilemap.clone(), tile_size);
        let level_width = collision.width_units();
        let level_height = collision.height_units();
        let body = SnakeBody::new(
            to_world(layout.spawn),
            layout.initial_segments,
            layout.start_direction,
            tile_size,
        );

        let mut controller = MovementController::new(
            layout.mode,
            layout.start_direction,
            MovementSettings {
                tile_size,
                speed: config.speed,
                level_width,
            },
        );
        controller.set_wrap_enabled(layout.wrap);
        controller.set_cinematic(layout.cinematic);
        controller.set_auto_advance(layout.auto_advance);

        let consumables = layout
            .consumables
            .iter()
            .map(|(kind, tile)| Consumable::new(*kind, to_world(*tile)))
            .collect();

        Self {
            name: layout.name.clone(),
            mode: layout.mode,
            body,
            controller,
            collision,
            consumables,
            tracker: ConsumableTracker::new(config.dots_to_grow, config.enemies_to_clear),
            cosmetics: EatCosmetics::new(
                config.eat_effect_ticks,
                config.exit_blink_ticks,
                config.ticks_per_tile(),
            ),
            rng,
            tile_size,
            level_width,
            level_height,
            score: 0,
            paused: false,
            torn_down: false,
            exit_run_started: false,
            exit_fired: false,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn mode(&self) -> MovementMode {
        self.mode
    }

    pub(crate) fn body(&self) -> &SnakeBody {
        &self.body
    }

    pub(crate) fn consumables(&self) -> &[Consumable] {
        &self.consumables
    }

    pub(crate) fn cosmetics(&self) -> &EatCosmetics {
        &self.cosmetics
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn enemies_remaining(&self) -> u32 {
        self.tracker.enemies_remaining()
    }

    pub(crate) fn exit_unlocked(&self) -> bool {
        self.tracker.exit_unlocked()
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub(crate) fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Stops ticking and drops pending cosmetic timers.
    pub(crate) fn teardown(&mut self) {
        self.cosmetics.cancel();
        self.torn_down = true;
    }

    pub(crate) fn tick(&mut self, input: &InputSnapshot, events: &mut dyn SnakeEvents) -> TickOutcome {
        if self.paused || self.torn_down {
            return TickOutcome::Halted;
        }

        self.cosmetics.advance(&self.body);
        let outcome = self
            .controller
            .tick(&mut self.body, input, &self.collision, events);
        if !self.controller.is_dead() {
            self.collect_overlapping(events);
        }
        self.check_exit(events);
        self.check_left_level(events);
        outcome
    }

    fn collect_overlapping(&mut self, events: &mut dyn SnakeEvents) {
        let head = self.body.head().render_position;
        for index in 0..self.consumables.len() {
            let item = &self.consumables[index];
            if !item.alive || !item.overlaps(head, self.tile_size) {
                continue;
            }
            let kind = item.kind;
            let outcome = self.tracker.record_eat(kind);

            if outcome.grow {
                self.body.grow();
            }
            if outcome.respawn {
                self.respawn(index);
            } else {
                self.consumables[index].alive = false;
            }
            self.cosmetics.on_eat(outcome.spawn_bulge);
            self.score += 1;
            info!(
                level = %self.name,
                ?kind,
                score = self.score,
                enemies_remaining = self.tracker.enemies_remaining(),
                "item_eaten"
            );
            events.on_item_eaten(kind);

            if outcome.exit_unlocked {
                self.unlock_exit();
            }
        }
    }

    /// Moves an item to a random tile no segment covers. Retires it when the
    /// level is full, so it cannot be eaten again from under the head.
    fn respawn(&mut self, index: usize) {
        let tilemap = self.collision.tilemap();
        let mut free = Vec::new();
        for tile_y in 0..tilemap.height() as i32 {
            for tile_x in 0..tilemap.width() as i32 {
                if tilemap.is_solid(tile_x, tile_y) {
                    continue;
                }
                let point = Point::new(tile_x * self.tile_size, tile_y * self.tile_size);
                let taken = self.body.occupies(point)
                    || self
                        .consumables
                        .iter()
                        .any(|item| item.alive && item.position == point);
                if !taken {
                    free.push(point);
                }
            }
        }

        match free.choose(&mut self.rng) {
            Some(point) => {
                debug!(kind = ?self.consumables[index].kind, x = point.x, y = point.y, "item_respawned");
                self.consumables[index].position = *point;
            }
            None => {
                debug!(kind = ?self.consumables[index].kind, "item_respawn_skipped");
                self.consumables[index].alive = false;
            }
        }
    }

    /// Kills the snake once its head is above or below the map.
    fn check_left_level(&mut self, events: &mut dyn SnakeEvents) {
        if self.exit_fired || self.controller.is_dead() {
            return;
        }
        let head = self.body.head().position;
        if head.y < 0 || head.y >= self.level_height {
            debug!(level = %self.name, x = head.x, y = head.y, "snake_left_level");
            self.controller.die(DeathCause::LeftLevel, events);
        }
    }

    fn unlock_exit(&mut self) {
        self.controller.set_wrap_enabled(false);
        self.cosmetics.on_exit_unlocked();
        info!(level = %self.name, "level_exit_unlocked");
    }

    fn check_exit(&mut self, events: &mut dyn SnakeEvents) {
        if !self.tracker.exit_unlocked() || self.exit_fired {
            return;
        }

        // Free movement dies at the boundary, so it leaves by running right
        // into it instead. Never start that run while heading left.
        if self.mode == MovementMode::Free
            && !self.exit_run_started
            && self.body.direction() != Direction::Left
        {
            self.exit_run_started = true;
            self.controller.set_cinematic(true);
            self.controller.set_auto_advance(true);
        }

        if self.body.tail().position.x > self.level_width {
            self.exit_fired = true;
            self.paused = true;
            info!(level = %self.name, score = self.score, "level_exit_reached");
            events.on_next_level();
        }
    }
}
