mod input;
mod input_source;
mod loop_runner;
mod metrics;
mod scene;
mod tilemap;
mod timers;

pub use input::InputAction;
pub use input_source::{InputSource, ScriptedInput, ScriptedInputEvent};
pub use loop_runner::{run_app, AppError, ExitReason, LoopConfig, RunSummary};
pub use metrics::LoopMetricsSnapshot;
pub use scene::{InputSnapshot, Scene, SceneCommand, SceneError, Vec2};
pub use tilemap::{Tilemap, TilemapError, TILE_EMPTY, TILE_WALL};
pub use timers::TimerQueue;
