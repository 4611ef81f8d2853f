use engine::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ConsumableKind {
    Apple,
    Dot,
    Ghost,
    Pacoman,
    Coin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GrowthCadence {
    EveryCollection,
    /// Grows once per `dots_to_grow` collections.
    EveryNth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EatAction {
    Respawn,
    Die,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConsumablePolicy {
    pub(crate) growth: GrowthCadence,
    pub(crate) on_eat: EatAction,
    pub(crate) is_enemy: bool,
    pub(crate) spawns_bulge: bool,
}

impl ConsumableKind {
    pub(crate) const fn policy(self) -> ConsumablePolicy {
        match self {
            ConsumableKind::Apple => ConsumablePolicy {
                growth: GrowthCadence::EveryCollection,
                on_eat: EatAction::Respawn,
                is_enemy: false,
                spawns_bulge: true,
            },
            ConsumableKind::Dot => ConsumablePolicy {
                growth: GrowthCadence::EveryNth,
                on_eat: EatAction::Die,
                is_enemy: false,
                spawns_bulge: false,
            },
            ConsumableKind::Ghost | ConsumableKind::Pacoman => ConsumablePolicy {
                growth: GrowthCadence::EveryCollection,
                on_eat: EatAction::Die,
                is_enemy: true,
                spawns_bulge: true,
            },
            ConsumableKind::Coin => ConsumablePolicy {
                growth: GrowthCadence::EveryCollection,
                on_eat: EatAction::Die,
                is_enemy: false,
                spawns_bulge: false,
            },
        }
    }

    pub(crate) fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'A' => Some(ConsumableKind::Apple),
            'o' => Some(ConsumableKind::Dot),
            'G' => Some(ConsumableKind::Ghost),
            'P' => Some(ConsumableKind::Pacoman),
            'C' => Some(ConsumableKind::Coin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Consumable {
    pub(crate) kind: ConsumableKind,
    pub(crate) position: Point,
    pub(crate) alive: bool,
}

impl Consumable {
    pub(crate) fn new(kind: ConsumableKind, position: Point) -> Self {
        Self {
            kind,
            position,
            alive: true,
        }
    }

    /// Strict overlap between the tile box at `head` and this item's tile box.
    /// Boxes that only share an edge do not overlap.
    pub(crate) fn overlaps(&self, head: Vec2, tile_size: i32) -> bool {
        let size = tile_size as f32;
        let item = self.position.to_vec2();
        head.x < item.x + size
            && item.x < head.x + size
            && head.y < item.y + size
            && item.y < head.y + size
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct EatOutcome {
    pub(crate) grow: bool,
    pub(crate) respawn: bool,
    pub(crate) spawn_bulge: bool,
    pub(crate) exit_unlocked: bool,
}

/// Counters that span several collections: the dot cadence and the number of
/// enemies left before the level exit opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConsumableTracker {
    dots_to_grow: u32,
    remaining_to_grow: u32,
    enemies_remaining: u32,
    exit_unlocked: bool,
}

impl ConsumableTracker {
    pub(crate) fn new(dots_to_grow: u32, enemies_to_clear: u32) -> Self {
        let dots_to_grow = dots_to_grow.max(1);
        Self {
            dots_to_grow,
            remaining_to_grow: dots_to_grow,
            enemies_remaining: enemies_to_clear,
            exit_unlocked: false,
        }
    }

    pub(crate) fn enemies_remaining(&self) -> u32 {
        self.enemies_remaining
    }

    #[cfg(test)]
    pub(crate) fn remaining_to_grow(&self) -> u32 {
        self.remaining_to_grow
    }

    pub(crate) fn exit_unlocked(&self) -> bool {
        self.exit_unlocked
    }

    pub(crate) fn record_eat(&mut self, kind: ConsumableKind) -> EatOutcome {
        let policy = kind.policy();
        let grow = match policy.growth {
            GrowthCadence::EveryCollection => true,
            GrowthCadence::EveryNth => {
                self.remaining_to_grow -= 1;
                if self.remaining_to_grow == 0 {
                    self.remaining_to_grow = self.dots_to_grow;
                    true
                } else {
                    false
                }
            }
        };

        let mut exit_unlocked = false;
        if policy.is_enemy {
            self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
            if self.enemies_remaining == 0 && !self.exit_unlocked {
                self.exit_unlocked = true;
                exit_unlocked = true;
            }
        }

        EatOutcome {
            grow,
            respawn: policy.on_eat == EatAction::Respawn,
            spawn_bulge: policy.spawns_bulge,
            exit_unlocked,
        }
    }
}
