use engine::InputSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::body::SnakeBody;
use super::collision::CollisionChecker;
use super::consumables::ConsumableKind;
use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum MovementMode {
    /// Classic snake: walls and the own body kill.
    Free,
    /// Maze movement: walls stop the snake instead of killing it.
    ObstacleConstrained,
    /// Platformer movement: the body falls until some segment rests on a floor.
    GravityConstrained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeathCause {
    HitObstacle,
    HitSelf,
    /// The head dropped or climbed out of the map.
    LeftLevel,
}

/// Owner callbacks. Each logical event is delivered at most once.
pub(crate) trait SnakeEvents {
    fn on_died(&mut self, _cause: DeathCause) {}
    fn on_item_eaten(&mut self, _kind: ConsumableKind) {}
    fn on_next_level(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Between tile boundaries; render positions were interpolated.
    Interpolated,
    /// A tile step was committed.
    Stepped,
    /// The tile boundary was reached but the next tile is solid.
    Blocked,
    /// Cinematic hold, death or level completion stopped movement.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MovementSettings {
    pub(crate) tile_size: i32,
    pub(crate) speed: f32,
    pub(crate) level_width: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MovementController {
    mode: MovementMode,
    settings: MovementSettings,
    candidate: Direction,
    progress: f32,
    input_locked: bool,
    wrap_enabled: bool,
    cinematic: bool,
    auto_advance: bool,
    dead: bool,
    level_finished: bool,
}

impl MovementController {
    pub(crate) fn new(
        mode: MovementMode,
        initial_direction: Direction,
        settings: MovementSettings,
    ) -> Self {
        Self {
            mode,
            settings,
            candidate: initial_direction,
            progress: 0.0,
            input_locked: false,
            wrap_enabled: true,
            cinematic: false,
            auto_advance: false,
            dead: false,
            level_finished: false,
        }
    }

    pub(crate) fn is_dead(&self) -> bool {
        self.dead
    }

    pub(crate) fn set_wrap_enabled(&mut self, enabled: bool) {
        self.wrap_enabled = enabled;
    }

    pub(crate) fn set_cinematic(&mut self, cinematic: bool) {
        self.cinematic = cinematic;
    }

    pub(crate) fn set_auto_advance(&mut self, auto_advance: bool) {
        self.auto_advance = auto_advance;
    }

    #[cfg(test)]
    pub(crate) fn candidate(&self) -> Direction {
        self.candidate
    }

    #[cfg(test)]
    pub(crate) fn progress(&self) -> f32 {
        self.progress
    }

    #[cfg(test)]
    pub(crate) fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    pub(crate) fn tick(
        &mut self,
        body: &mut SnakeBody,
        input: &InputSnapshot,
        collision: &dyn CollisionChecker,
        events: &mut dyn SnakeEvents,
    ) -> TickOutcome {
        if self.dead || self.level_finished {
            return TickOutcome::Halted;
        }

        self.resolve_input(input);
        self.suppress_reversal(body.direction());

        match self.mode {
            MovementMode::Free => self.tick_free(body, collision, events),
            MovementMode::ObstacleConstrained => {
                self.progress += self.settings.speed;
                self.discard_blocked_candidate(body, collision);
                let outcome = self.commit_if_unblocked(body, collision);
                if outcome == TickOutcome::Stepped && body.collides_with_self() {
                    self.die(DeathCause::HitSelf, events);
                }
                if self.wrap_enabled {
                    self.wrap(body);
                }
                outcome
            }
            MovementMode::GravityConstrained => {
                self.progress += self.settings.speed;
                if !self.on_ground(body, collision) {
                    self.candidate = Direction::Down;
                }
                self.discard_blocked_candidate(body, collision);
                self.commit_if_unblocked(body, collision)
            }
        }
    }

    fn resolve_input(&mut self, input: &InputSnapshot) {
        if self.input_locked {
            return;
        }
        if let Some(direction) = input.pressed_direction().and_then(Direction::from_input) {
            self.candidate = direction;
        }
        if input.any_movement_down() {
            self.input_locked = true;
        }
    }

    fn suppress_reversal(&mut self, current: Direction) {
        if self.candidate.is_opposite(current) {
            self.candidate = current;
        }
    }

    fn tile_progress(&self) -> f32 {
        self.progress / self.settings.tile_size as f32
    }

    fn reached_tile_boundary(&self) -> bool {
        self.progress >= self.settings.tile_size as f32
    }

    fn tick_free(
        &mut self,
        body: &mut SnakeBody,
        collision: &dyn CollisionChecker,
        events: &mut dyn SnakeEvents,
    ) -> TickOutcome {
        let advancing = !self.cinematic || self.auto_advance;
        if advancing {
            self.progress += self.settings.speed;
        }
        if !self.reached_tile_boundary() {
            body.interpolate(self.tile_progress());
            return if advancing {
                TickOutcome::Interpolated
            } else {
                TickOutcome::Halted
            };
        }

        self.input_locked = false;
        if !advancing {
            return TickOutcome::Halted;
        }
        self.progress = 0.0;

        let next = if self.auto_advance {
            Direction::Right
        } else {
            self.candidate
        };
        body.set_direction(next);
        body.step();

        let head = body.head().position;
        let mut hit_boundary = false;
        collision.check_collision(head.x, head.y, &mut || hit_boundary = true);
        if hit_boundary {
            if self.auto_advance {
                self.finish_level(events);
            } else {
                self.die(DeathCause::HitObstacle, events);
            }
        } else if body.collides_with_self() {
            self.die(DeathCause::HitSelf, events);
        }
        TickOutcome::Stepped
    }

    fn blocked_ahead(
        &self,
        body: &SnakeBody,
        direction: Direction,
        collision: &dyn CollisionChecker,
    ) -> bool {
        let target = body
            .head()
            .position
            .offset(direction, self.settings.tile_size);
        collision.collides(target.x, target.y)
    }

    fn discard_blocked_candidate(&mut self, body: &SnakeBody, collision: &dyn CollisionChecker) {
        if self.blocked_ahead(body, self.candidate, collision) {
            self.input_locked = false;
            self.candidate = body.direction();
        }
    }

    fn commit_if_unblocked(
        &mut self,
        body: &mut SnakeBody,
        collision: &dyn CollisionChecker,
    ) -> TickOutcome {
        if !self.reached_tile_boundary() {
            body.interpolate(self.tile_progress());
            return TickOutcome::Interpolated;
        }

        self.input_locked = false;
        body.set_direction(self.candidate);
        if self.blocked_ahead(body, self.candidate, collision) {
            // Hold at the boundary and retry next tick.
            self.progress = self.settings.tile_size as f32;
            body.interpolate(1.0);
            return TickOutcome::Blocked;
        }

        body.step();
        self.progress = 0.0;
        TickOutcome::Stepped
    }

    fn on_ground(&self, body: &SnakeBody, collision: &dyn CollisionChecker) -> bool {
        body.segments().iter().any(|segment| {
            collision.collides(
                segment.position.x,
                segment.position.y + self.settings.tile_size,
            )
        })
    }

    fn wrap(&self, body: &mut SnakeBody) {
        let tail_x = body.tail().position.x;
        let direction = body.direction();
        if direction == Direction::Left && tail_x < -self.settings.tile_size {
            debug!(to_x = self.settings.level_width, "snake_wrapped");
            body.warp(self.settings.level_width, Direction::Left);
        } else if direction == Direction::Right && tail_x > self.settings.level_width {
            debug!(to_x = 0, "snake_wrapped");
            body.warp(0, Direction::Right);
        }
    }

    pub(crate) fn die(&mut self, cause: DeathCause, events: &mut dyn SnakeEvents) {
        if self.dead {
            return;
        }
        self.dead = true;
        info!(?cause, "snake_died");
        events.on_died(cause);
    }

    fn finish_level(&mut self, events: &mut dyn SnakeEvents) {
        if self.level_finished {
            return;
        }
        self.level_finished = true;
        info!(mode = ?self.mode, "level_completed");
        events.on_next_level();
    }
}
