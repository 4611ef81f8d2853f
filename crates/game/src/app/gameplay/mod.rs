mod body;
mod collision;
mod consumables;
mod controller;
mod cosmetics;
mod direction;
mod level;
mod level_def;
mod scene_impl;

pub(crate) use level_def::{builtin_levels, load_level_def, LevelDefError, LevelLayout};
pub(crate) use scene_impl::SnakeScene;
