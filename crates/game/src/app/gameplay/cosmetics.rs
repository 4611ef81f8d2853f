use engine::TimerQueue;

use super::body::{Point, SnakeBody};
use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CosmeticEffect {
    RestoreHead,
    SpawnBulge,
    BlinkExit,
}

/// Swallowed-item bulge drawn over the body for a while after eating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FatBulge {
    pub(crate) position: Point,
    pub(crate) direction: Direction,
    pub(crate) remaining_ticks: u32,
}

/// Presentation-only state around eating and the level exit. Reads the body,
/// never writes it.
#[derive(Debug)]
pub(crate) struct EatCosmetics {
    timers: TimerQueue<CosmeticEffect>,
    effect_ticks: u64,
    blink_ticks: u64,
    ticks_per_tile: u32,
    eating_head: bool,
    bulges: Vec<FatBulge>,
    exit_marker_visible: bool,
}

impl EatCosmetics {
    pub(crate) fn new(effect_ticks: u64, blink_ticks: u64, ticks_per_tile: u32) -> Self {
        Self {
            timers: TimerQueue::new(),
            effect_ticks,
            blink_ticks: blink_ticks.max(1),
            ticks_per_tile,
            eating_head: false,
            bulges: Vec::new(),
            exit_marker_visible: false,
        }
    }

    pub(crate) fn eating_head(&self) -> bool {
        self.eating_head
    }

    pub(crate) fn bulges(&self) -> &[FatBulge] {
        &self.bulges
    }

    pub(crate) fn exit_marker_visible(&self) -> bool {
        self.exit_marker_visible
    }

    #[cfg(test)]
    pub(crate) fn pending_effects(&self) -> usize {
        self.timers.len()
    }

    pub(crate) fn on_eat(&mut self, spawn_bulge: bool) {
        self.eating_head = true;
        self.timers
            .schedule(self.effect_ticks, CosmeticEffect::RestoreHead);
        if spawn_bulge {
            self.timers
                .schedule(self.effect_ticks, CosmeticEffect::SpawnBulge);
        }
    }

    pub(crate) fn on_exit_unlocked(&mut self) {
        self.exit_marker_visible = true;
        self.timers.schedule(self.blink_ticks, CosmeticEffect::BlinkExit);
    }

    pub(crate) fn advance(&mut self, body: &SnakeBody) {
        self.bulges.retain_mut(|bulge| {
            if bulge.remaining_ticks == 0 {
                return false;
            }
            bulge.remaining_ticks -= 1;
            true
        });

        for effect in self.timers.advance() {
            match effect {
                CosmeticEffect::RestoreHead => self.eating_head = false,
                CosmeticEffect::SpawnBulge => {
                    // Lives as long as the bulge takes to travel to the tail.
                    let segment = body.segments().get(1).unwrap_or_else(|| body.head());
                    let remaining_ticks = self.ticks_per_tile * (body.len() as u32 - 1);
                    self.bulges.push(FatBulge {
                        position: segment.position,
                        direction: segment.direction,
                        remaining_ticks,
                    });
                }
                CosmeticEffect::BlinkExit => {
                    self.exit_marker_visible = !self.exit_marker_visible;
                    self.timers.schedule(self.blink_ticks, CosmeticEffect::BlinkExit);
                }
            }
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.timers.cancel_all();
        self.eating_head = false;
        self.bulges.clear();
        self.exit_marker_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> SnakeBody {
        SnakeBody::new(Point::new(96, 0), 2, Direction::Right, 32)
    }

    #[test]
    fn eating_head_restores_after_effect_ticks() {
        let body = body();
        let mut cosmetics = EatCosmetics::new(4, 10, 8);
        cosmetics.on_eat(false);

        for _ in 0..3 {
            cosmetics.advance(&body);
            assert!(cosmetics.eating_head());
        }
        cosmetics.advance(&body);
        assert!(!cosmetics.eating_head());
        assert!(cosmetics.bulges().is_empty());
    }

    #[test]
    fn bulge_spawns_on_neck_and_expires() {
        let body = body();
        let mut cosmetics = EatCosmetics::new(4, 10, 8);
        cosmetics.on_eat(true);

        for _ in 0..4 {
            cosmetics.advance(&body);
        }
        assert_eq!(
            cosmetics.bulges(),
            &[FatBulge {
                position: Point::new(64, 0),
                direction: Direction::Right,
                remaining_ticks: 16,
            }]
        );

        for _ in 0..16 {
            cosmetics.advance(&body);
        }
        assert_eq!(cosmetics.bulges().len(), 1);
        cosmetics.advance(&body);
        assert!(cosmetics.bulges().is_empty());
    }

    #[test]
    fn exit_marker_blinks_until_cancelled() {
        let body = body();
        let mut cosmetics = EatCosmetics::new(4, 10, 8);
        cosmetics.on_exit_unlocked();
        assert!(cosmetics.exit_marker_visible());

        for _ in 0..10 {
            cosmetics.advance(&body);
        }
        assert!(!cosmetics.exit_marker_visible());
        for _ in 0..10 {
            cosmetics.advance(&body);
        }
        assert!(cosmetics.exit_marker_visible());

        cosmetics.cancel();
        assert_eq!(cosmetics.pending_effects(), 0);
        assert!(!cosmetics.exit_marker_visible());
    }

    #[test]
    fn cancel_drops_pending_restore() {
        let body = body();
        let mut cosmetics = EatCosmetics::new(4, 10, 8);
        cosmetics.on_eat(true);
        cosmetics.cancel();

        for _ in 0..8 {
            cosmetics.advance(&body);
        }
        assert!(!cosmetics.eating_head());
        assert!(cosmetics.bulges().is_empty());
    }
}
