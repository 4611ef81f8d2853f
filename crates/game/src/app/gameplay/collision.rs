use engine::Tilemap;

/// Static level geometry queries in world units.
pub(crate) trait CollisionChecker {
    /// True when the point lies on a solid tile. Points outside the level are
    /// not solid, which lets the body slide through open edges.
    fn collides(&self, x: i32, y: i32) -> bool;

    fn in_bounds(&self, x: i32, y: i32) -> bool;

    /// Calls `on_hit` when the point is solid or outside the level.
    fn check_collision(&self, x: i32, y: i32, on_hit: &mut dyn FnMut()) {
        if !self.in_bounds(x, y) || self.collides(x, y) {
            on_hit();
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct TileCollision {
    tilemap: Tilemap,
    tile_size: i32,
}

impl TileCollision {
    pub(crate) fn new(tilemap: Tilemap, tile_size: i32) -> Self {
        debug_assert!(tile_size > 0);
        Self { tilemap, tile_size }
    }

    pub(crate) fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub(crate) fn width_units(&self) -> i32 {
        self.tilemap.width() as i32 * self.tile_size
    }

    pub(crate) fn height_units(&self) -> i32 {
        self.tilemap.height() as i32 * self.tile_size
    }

    fn to_tile(&self, x: i32, y: i32) -> (i32, i32) {
        (x.div_euclid(self.tile_size), y.div_euclid(self.tile_size))
    }
}

impl CollisionChecker for TileCollision {
    fn collides(&self, x: i32, y: i32) -> bool {
        let (tile_x, tile_y) = self.to_tile(x, y);
        self.tilemap.is_solid(tile_x, tile_y)
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        let (tile_x, tile_y) = self.to_tile(x, y);
        self.tilemap.contains(tile_x, tile_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{TILE_EMPTY, TILE_WALL};

    fn corridor() -> TileCollision {
        #[rustfmt::skip]
        let tiles = vec![
            TILE_WALL, TILE_WALL, TILE_WALL,
            TILE_EMPTY, TILE_EMPTY, TILE_EMPTY,
            TILE_WALL, TILE_WALL, TILE_WALL,
        ];
        TileCollision::new(Tilemap::new(3, 3, tiles).expect("tilemap"), 32)
    }

    #[test]
    fn world_units_map_to_tiles() {
        let collision = corridor();
        assert!(collision.collides(0, 0));
        assert!(collision.collides(95, 31));
        assert!(!collision.collides(32, 32));
        assert!(!collision.collides(64, 63));
        assert!(collision.collides(64, 64));
        assert_eq!(collision.width_units(), 96);
        assert_eq!(collision.height_units(), 96);
    }

    #[test]
    fn negative_coordinates_are_outside_not_solid() {
        let collision = corridor();
        assert!(!collision.collides(-32, 32));
        assert!(!collision.in_bounds(-1, 32));
        assert!(collision.in_bounds(0, 32));
        assert!(!collision.in_bounds(96, 32));
    }

    #[test]
    fn check_collision_fires_for_walls_and_out_of_bounds() {
        let collision = corridor();
        let mut hits = 0;

        collision.check_collision(32, 32, &mut || hits += 1);
        assert_eq!(hits, 0);
        collision.check_collision(32, 0, &mut || hits += 1);
        assert_eq!(hits, 1);
        collision.check_collision(96, 32, &mut || hits += 1);
        assert_eq!(hits, 2);
    }
}
