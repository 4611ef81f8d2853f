use thiserror::Error;

pub const TILE_EMPTY: u16 = 0;
pub const TILE_WALL: u16 = 1;

/// Row-major grid of tile ids. Tile (0,0) is the top-left corner and y grows
/// downward, matching screen space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tilemap {
    width: u32,
    height: u32,
    tiles: Vec<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("tilemap must have a non-zero size, got {width}x{height}")]
    Empty { width: u32, height: u32 },
}

impl Tilemap {
    pub fn new(width: u32, height: u32, tiles: Vec<u16>) -> Result<Self, TilemapError> {
        if width == 0 || height == 0 {
            return Err(TilemapError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(TilemapError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<u16> {
        self.index_of(x, y)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Out-of-range coordinates are not solid; bounds are a separate query.
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y).is_some_and(|tile| tile != TILE_EMPTY)
    }
}
