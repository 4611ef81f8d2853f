use engine::InputAction;
use serde::{Deserialize, Serialize};

/// Cardinal direction in screen space: y grows downward, so `Up` is -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub(crate) const fn delta_x(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Up | Direction::Down => 0,
        }
    }

    pub(crate) const fn delta_y(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            Direction::Left | Direction::Right => 0,
        }
    }

    pub(crate) const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    pub(crate) fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Direction of an axis-aligned offset of any length. Zero and diagonal
    /// offsets have no direction.
    pub(crate) fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Some(Direction::Up),
            (1, 0) => Some(Direction::Right),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            _ => None,
        }
    }

    pub(crate) fn from_input(action: InputAction) -> Option<Self> {
        match action {
            InputAction::MoveUp => Some(Direction::Up),
            InputAction::MoveRight => Some(Direction::Right),
            InputAction::MoveDown => Some(Direction::Down),
            InputAction::MoveLeft => Some(Direction::Left),
            InputAction::Pause | InputAction::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    #[test]
    fn deltas_are_unit_and_axis_aligned() {
        for direction in ALL {
            let dx = direction.delta_x();
            let dy = direction.delta_y();
            assert_eq!(dx.abs() + dy.abs(), 1, "{direction:?}");
        }
        assert_eq!((Direction::Up.delta_x(), Direction::Up.delta_y()), (0, -1));
        assert_eq!(
            (Direction::Right.delta_x(), Direction::Right.delta_y()),
            (1, 0)
        );
    }

    #[test]
    fn opposite_negates_delta() {
        for direction in ALL {
            let opposite = direction.opposite();
            assert_eq!(opposite.delta_x(), -direction.delta_x());
            assert_eq!(opposite.delta_y(), -direction.delta_y());
            assert!(direction.is_opposite(opposite));
            assert!(!direction.is_opposite(direction));
        }
    }

    #[test]
    fn offset_round_trips_through_delta() {
        for direction in ALL {
            let recovered = Direction::from_offset(direction.delta_x() * 32, direction.delta_y() * 32);
            assert_eq!(recovered, Some(direction));
        }
    }

    #[test]
    fn zero_and_diagonal_offsets_have_no_direction() {
        assert_eq!(Direction::from_offset(0, 0), None);
        assert_eq!(Direction::from_offset(32, -32), None);
    }

    #[test]
    fn only_movement_actions_map_to_directions() {
        assert_eq!(
            Direction::from_input(InputAction::MoveLeft),
            Some(Direction::Left)
        );
        assert_eq!(Direction::from_input(InputAction::Pause), None);
    }
}
