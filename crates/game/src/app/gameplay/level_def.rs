use std::fs;
use std::path::{Path, PathBuf};

use engine::{Tilemap, TilemapError, TILE_EMPTY, TILE_WALL};
use serde::Deserialize;
use thiserror::Error;

use super::body::Point;
use super::consumables::ConsumableKind;
use super::controller::MovementMode;
use super::direction::Direction;

const BUILTIN_LEVELS: [(&str, &str); 3] = [
    (
        "builtin:snake",
        include_str!("../../../assets/levels/snake.json"),
    ),
    (
        "builtin:pacman",
        include_str!("../../../assets/levels/pacman.json"),
    ),
    (
        "builtin:platformer",
        include_str!("../../../assets/levels/platformer.json"),
    ),
];

/// Level file as authored: one ASCII row per tile row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelDef {
    pub(crate) name: String,
    pub(crate) mode: MovementMode,
    pub(crate) rows: Vec<String>,
    #[serde(default = "default_start_direction")]
    pub(crate) start_direction: Direction,
    #[serde(default = "default_initial_segments")]
    pub(crate) initial_segments: usize,
    #[serde(default = "default_true")]
    pub(crate) wrap: bool,
    #[serde(default)]
    pub(crate) cinematic: bool,
    #[serde(default)]
    pub(crate) auto_advance: bool,
}

fn default_start_direction() -> Direction {
    Direction::Right
}

fn default_initial_segments() -> usize {
    2
}

fn default_true() -> bool {
    true
}

/// Parsed level. Spawn and item positions are tile coordinates.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LevelLayout {
    pub(crate) name: String,
    pub(crate) mode: MovementMode,
    pub(crate) tilemap: Tilemap,
    pub(crate) spawn: Point,
    pub(crate) start_direction: Direction,
    pub(crate) initial_segments: usize,
    pub(crate) wrap: bool,
    pub(crate) cinematic: bool,
    pub(crate) auto_advance: bool,
    pub(crate) consumables: Vec<(ConsumableKind, Point)>,
}

#[derive(Debug, Error)]
pub(crate) enum LevelDefError {
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("level {name} has no rows")]
    Empty { name: String },
    #[error("level {name} row {row} has {actual} columns, expected {expected}")]
    RaggedRow {
        name: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("level {name} has unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        name: String,
        glyph: char,
        column: usize,
        row: usize,
    },
    #[error("level {name} has no snake spawn 'S'")]
    MissingSpawn { name: String },
    #[error("level {name} has a second snake spawn at column {column}, row {row}")]
    DuplicateSpawn {
        name: String,
        column: usize,
        row: usize,
    },
    #[error(transparent)]
    Tilemap(#[from] TilemapError),
}

impl LevelDef {
    pub(crate) fn into_layout(self) -> Result<LevelLayout, LevelDefError> {
        let Some(first) = self.rows.first() else {
            return Err(LevelDefError::Empty { name: self.name });
        };
        let width = first.chars().count();
        if width == 0 {
            return Err(LevelDefError::Empty { name: self.name });
        }

        let mut tiles = Vec::with_capacity(width * self.rows.len());
        let mut spawn = None;
        let mut consumables = Vec::new();
        for (row, line) in self.rows.iter().enumerate() {
            let actual = line.chars().count();
            if actual != width {
                return Err(LevelDefError::RaggedRow {
                    name: self.name.clone(),
                    row,
                    expected: width,
                    actual,
                });
            }

            for (column, glyph) in line.chars().enumerate() {
                let here = Point::new(column as i32, row as i32);
                let tile = match glyph {
                    '#' => TILE_WALL,
                    '.' => TILE_EMPTY,
                    'S' => {
                        if spawn.replace(here).is_some() {
                            return Err(LevelDefError::DuplicateSpawn {
                                name: self.name.clone(),
                                column,
                                row,
                            });
                        }
                        TILE_EMPTY
                    }
                    other => match ConsumableKind::from_glyph(other) {
                        Some(kind) => {
                            consumables.push((kind, here));
                            TILE_EMPTY
                        }
                        None => {
                            return Err(LevelDefError::UnknownGlyph {
                                name: self.name.clone(),
                                glyph: other,
                                column,
                                row,
                            })
                        }
                    },
                };
                tiles.push(tile);
            }
        }

        let Some(spawn) = spawn else {
            return Err(LevelDefError::MissingSpawn { name: self.name });
        };
        let tilemap = Tilemap::new(width as u32, self.rows.len() as u32, tiles)?;

        Ok(LevelLayout {
            name: self.name,
            mode: self.mode,
            tilemap,
            spawn,
            start_direction: self.start_direction,
            initial_segments: self.initial_segments,
            wrap: self.wrap,
            cinematic: self.cinematic,
            auto_advance: self.auto_advance,
            consumables,
        })
    }
}

pub(crate) fn parse_level_def(raw: &str, origin: &str) -> Result<LevelLayout, LevelDefError> {
    let deserializer = &mut serde_json::Deserializer::from_str(raw);
    let def: LevelDef =
        serde_path_to_error::deserialize(deserializer).map_err(|source| LevelDefError::Parse {
            origin: origin.to_string(),
            source,
        })?;
    def.into_layout()
}

pub(crate) fn load_level_def(path: &Path) -> Result<LevelLayout, LevelDefError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelDefError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level_def(&raw, &path.display().to_string())
}

pub(crate) fn builtin_levels() -> Result<Vec<LevelLayout>, LevelDefError> {
    BUILTIN_LEVELS
        .iter()
        .map(|(origin, raw)| parse_level_def(raw, origin))
        .collect()
}
