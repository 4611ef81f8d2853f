pub mod app;

pub use app::{
    run_app, AppError, ExitReason, InputAction, InputSnapshot, InputSource, LoopConfig,
    LoopMetricsSnapshot, RunSummary, Scene, SceneCommand, SceneError, ScriptedInput,
    ScriptedInputEvent, Tilemap, TilemapError, TimerQueue, Vec2, TILE_EMPTY, TILE_WALL,
};
