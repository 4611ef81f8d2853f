use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Pause,
    Quit,
}

const ACTION_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }

    pub(crate) fn any_movement_down(&self) -> bool {
        InputAction::MOVEMENT
            .iter()
            .any(|action| self.is_down(*action))
    }
}

impl InputAction {
    pub const MOVEMENT: [InputAction; 4] = [
        InputAction::MoveUp,
        InputAction::MoveDown,
        InputAction::MoveLeft,
        InputAction::MoveRight,
    ];

    pub const fn is_movement(self) -> bool {
        matches!(
            self,
            InputAction::MoveUp
                | InputAction::MoveDown
                | InputAction::MoveLeft
                | InputAction::MoveRight
        )
    }

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Pause => 4,
            InputAction::Quit => 5,
        }
    }
}
