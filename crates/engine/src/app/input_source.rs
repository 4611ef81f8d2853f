use serde::{Deserialize, Serialize};

use super::input::{ActionStates, InputAction};
use super::scene::InputSnapshot;

pub trait InputSource {
    fn snapshot_for_tick(&mut self, tick: u64) -> InputSnapshot;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedInputEvent {
    pub tick: u64,
    pub action: InputAction,
    #[serde(default = "default_pressed")]
    pub pressed: bool,
}

fn default_pressed() -> bool {
    true
}

/// Replays tick-stamped press/release events, for headless runs.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    events: Vec<ScriptedInputEvent>,
    cursor: usize,
    collector: InputCollector,
}

impl ScriptedInput {
    pub fn new(mut events: Vec<ScriptedInputEvent>) -> Self {
        events.sort_by_key(|event| event.tick);
        Self {
            events,
            cursor: 0,
            collector: InputCollector::default(),
        }
    }

    pub fn remaining_events(&self) -> usize {
        self.events.len() - self.cursor
    }
}

impl InputSource for ScriptedInput {
    fn snapshot_for_tick(&mut self, tick: u64) -> InputSnapshot {
        while let Some(event) = self.events.get(self.cursor) {
            if event.tick > tick {
                break;
            }
            self.collector.handle_action(event.action, event.pressed);
            self.cursor += 1;
        }
        self.collector.snapshot_for_tick()
    }
}

#[derive(Debug, Clone, Default)]
struct InputCollector {
    action_states: ActionStates,
    pressed_direction: Option<InputAction>,
    pause_pressed_edge: bool,
    quit_pressed_edge: bool,
}

impl InputCollector {
    fn handle_action(&mut self, action: InputAction, is_pressed: bool) {
        let was_down = self.action_states.is_down(action);
        self.action_states.set(action, is_pressed);

        match action {
            InputAction::Pause => {
                if is_pressed && !was_down {
                    self.pause_pressed_edge = true;
                }
            }
            InputAction::Quit => {
                if is_pressed && !was_down {
                    self.quit_pressed_edge = true;
                }
            }
            movement => {
                if is_pressed {
                    self.pressed_direction = Some(movement);
                } else if self.pressed_direction == Some(movement) {
                    self.pressed_direction = None;
                }
            }
        }
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(
            self.action_states,
            self.pressed_direction,
            self.pause_pressed_edge,
            self.quit_pressed_edge,
        );
        self.pause_pressed_edge = false;
        self.quit_pressed_edge = false;
        snapshot
    }
}
