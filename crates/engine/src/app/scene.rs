use std::error::Error as StdError;

use thiserror::Error;

use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to load scene '{scene}': {source}")]
    Load {
        scene: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Input state sampled once per fixed tick.
///
/// `pressed_direction` is the most recently pressed movement action that is
/// still held; releasing it clears the slot even if other movement keys stay
/// down. Pause and quit are edge-triggered for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
    pressed_direction: Option<InputAction>,
    pause_pressed: bool,
    quit_requested: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        actions: ActionStates,
        pressed_direction: Option<InputAction>,
        pause_pressed: bool,
        quit_requested: bool,
    ) -> Self {
        Self {
            actions,
            pressed_direction,
            pause_pressed,
            quit_requested,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn any_movement_down(&self) -> bool {
        self.actions.any_movement_down()
    }

    pub fn pressed_direction(&self) -> Option<InputAction> {
        self.pressed_direction
    }

    pub fn pause_pressed(&self) -> bool {
        self.pause_pressed
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Marks `action` as held and as the latest pressed direction.
    pub fn with_pressed_direction(mut self, action: InputAction) -> Self {
        debug_assert!(action.is_movement());
        self.actions.set(action, true);
        self.pressed_direction = Some(action);
        self
    }

    pub fn with_pause_pressed(mut self, pause_pressed: bool) -> Self {
        self.pause_pressed = pause_pressed;
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2 {
            x: self.x + t * (to.x - self.x),
            y: self.y + t * (to.y - self.y),
        }
    }
}

pub trait Scene {
    fn load(&mut self) -> Result<(), SceneError>;
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
}
