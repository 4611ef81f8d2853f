use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use super::metrics::RateWindow;
use super::{InputSource, Scene, SceneCommand, SceneError};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    /// Paces ticks against the wall clock. When false, ticks run back to back
    /// and `max_ticks` must be set.
    pub realtime: bool,
    pub max_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            realtime: true,
            max_ticks: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    SceneLoad(#[from] SceneError),
    #[error("a loop that is not paced in real time needs a tick limit")]
    UnboundedRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    SceneQuit,
    TickLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub exit_reason: ExitReason,
}

const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);
const DEFAULT_METRICS_INTERVAL: Duration = Duration::from_secs(1);

pub fn run_app(
    config: LoopConfig,
    mut scene: Box<dyn Scene>,
    input: &mut dyn InputSource,
) -> Result<RunSummary, AppError> {
    if !config.realtime && config.max_ticks.is_none() {
        return Err(AppError::UnboundedRun);
    }

    scene.load()?;
    info!(title = %scene_title(scene.as_ref()), "scene_loaded");

    let target_tps = config.target_tps.max(1);
    let fixed_dt = Duration::from_secs_f64(1.0 / f64::from(target_tps));
    let fixed_dt_seconds = fixed_dt.as_secs_f32();
    let mut pacer = TickPacer::from_config(&config, fixed_dt);
    let metrics_interval = Some(config.metrics_log_interval)
        .filter(|interval| !interval.is_zero())
        .unwrap_or(DEFAULT_METRICS_INTERVAL);
    let mut window = RateWindow::open(Instant::now(), metrics_interval);

    info!(
        target_tps,
        pacer = ?pacer,
        max_ticks = ?config.max_ticks,
        "loop_config"
    );

    let mut ticks_run = 0u64;
    let mut last_pass = Instant::now();
    let exit_reason = 'passes: loop {
        let pass_start = Instant::now();
        let pass_dt = pass_start.saturating_duration_since(last_pass);
        last_pass = pass_start;

        let batch = pacer.next_batch(pass_dt);
        for _ in 0..batch.ticks {
            if config.max_ticks.is_some_and(|limit| ticks_run >= limit) {
                break 'passes ExitReason::TickLimit;
            }
            let snapshot = input.snapshot_for_tick(ticks_run);
            let command = scene.update(fixed_dt_seconds, &snapshot);
            ticks_run = ticks_run.saturating_add(1);
            if command == SceneCommand::Quit {
                break 'passes ExitReason::SceneQuit;
            }
        }
        if !batch.discarded.is_zero() {
            warn!(
                discarded_ms = batch.discarded.as_millis() as u64,
                batch = batch.ticks,
                "tick_backlog_discarded"
            );
        }

        window.record_pass(pass_dt, batch.ticks);
        if let Some(rates) = window.close_if_due(Instant::now()) {
            info!(
                fps = rates.fps,
                tps = rates.tps,
                frame_time_ms = rates.frame_time_ms,
                ticks_run,
                title = %scene_title(scene.as_ref()),
                "loop_metrics"
            );
        }

        if let Some(idle) = pacer.idle_time() {
            thread::sleep(idle);
        }
    };

    scene.unload();
    info!(ticks_run, reason = ?exit_reason, "shutdown");

    Ok(RunSummary {
        ticks_run,
        exit_reason,
    })
}

fn scene_title(scene: &dyn Scene) -> String {
    scene
        .debug_title()
        .unwrap_or_else(|| "untitled".to_string())
}

/// Ticks to run in one pass of the loop, plus any wall-clock backlog thrown
/// away because the pass hit its tick cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TickBatch {
    ticks: u32,
    discarded: Duration,
}

#[derive(Debug)]
enum TickPacer {
    /// Fixed timestep against the wall clock.
    Realtime {
        fixed_dt: Duration,
        max_pass_dt: Duration,
        max_batch: u32,
        backlog: Duration,
    },
    /// Full batches back to back; the tick limit ends the run.
    Headless { batch: u32 },
}

impl TickPacer {
    fn from_config(config: &LoopConfig, fixed_dt: Duration) -> Self {
        let max_batch = config.max_ticks_per_frame.max(1);
        if !config.realtime {
            return Self::Headless { batch: max_batch };
        }
        Self::Realtime {
            fixed_dt,
            max_pass_dt: Some(config.max_frame_delta)
                .filter(|delta| !delta.is_zero())
                .unwrap_or(DEFAULT_MAX_FRAME_DELTA),
            max_batch,
            backlog: Duration::ZERO,
        }
    }

    fn next_batch(&mut self, pass_dt: Duration) -> TickBatch {
        match self {
            Self::Headless { batch } => TickBatch {
                ticks: *batch,
                discarded: Duration::ZERO,
            },
            Self::Realtime {
                fixed_dt,
                max_pass_dt,
                max_batch,
                backlog,
            } => {
                *backlog = backlog.saturating_add(pass_dt.min(*max_pass_dt));
                let due = backlog.as_nanos() / fixed_dt.as_nanos().max(1);
                let ticks = u32::try_from(due).unwrap_or(u32::MAX).min(*max_batch);
                *backlog = backlog.saturating_sub(fixed_dt.saturating_mul(ticks));

                let discarded = if due > u128::from(ticks) {
                    std::mem::take(backlog)
                } else {
                    Duration::ZERO
                };
                TickBatch { ticks, discarded }
            }
        }
    }

    /// How long to sleep before the next tick is due. Headless runs never
    /// sleep.
    fn idle_time(&self) -> Option<Duration> {
        match self {
            Self::Headless { .. } => None,
            Self::Realtime {
                fixed_dt, backlog, ..
            } => Some(fixed_dt.saturating_sub(*backlog)).filter(|idle| !idle.is_zero()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::app::{InputAction, InputSnapshot, ScriptedInput, ScriptedInputEvent};

    #[derive(Debug, Default)]
    struct Calls {
        loads: u32,
        updates: u64,
        unloads: u32,
        movement_ticks: u64,
    }

    struct CountingScene {
        calls: Rc<RefCell<Calls>>,
        quit_after: Option<u64>,
        fail_load: bool,
    }

    impl CountingScene {
        fn boxed(calls: &Rc<RefCell<Calls>>) -> Box<Self> {
            Box::new(Self {
                calls: Rc::clone(calls),
                quit_after: None,
                fail_load: false,
            })
        }
    }

    impl Scene for CountingScene {
        fn load(&mut self) -> Result<(), SceneError> {
            if self.fail_load {
                return Err(SceneError::Load {
                    scene: "counting".to_string(),
                    source: "missing level".into(),
                });
            }
            self.calls.borrow_mut().loads += 1;
            Ok(())
        }

        fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
            let mut calls = self.calls.borrow_mut();
            calls.updates += 1;
            if input.any_movement_down() {
                calls.movement_ticks += 1;
            }
            if input.quit_requested() || self.quit_after == Some(calls.updates) {
                return SceneCommand::Quit;
            }
            SceneCommand::None
        }

        fn unload(&mut self) {
            self.calls.borrow_mut().unloads += 1;
        }
    }

    fn headless(max_ticks: u64) -> LoopConfig {
        LoopConfig {
            realtime: false,
            max_ticks: Some(max_ticks),
            ..LoopConfig::default()
        }
    }

    fn realtime_pacer(max_batch: u32) -> TickPacer {
        let config = LoopConfig {
            max_ticks_per_frame: max_batch,
            ..LoopConfig::default()
        };
        TickPacer::from_config(&config, Duration::from_millis(16))
    }

    #[test]
    fn realtime_pacer_keeps_the_partial_tick() {
        let mut pacer = realtime_pacer(5);

        let batch = pacer.next_batch(Duration::from_millis(40));
        assert_eq!(batch.ticks, 2);
        assert_eq!(batch.discarded, Duration::ZERO);
        assert_eq!(pacer.idle_time(), Some(Duration::from_millis(8)));

        let batch = pacer.next_batch(Duration::from_millis(8));
        assert_eq!(batch.ticks, 1);
        assert_eq!(pacer.idle_time(), Some(Duration::from_millis(16)));
    }

    #[test]
    fn realtime_pacer_discards_backlog_past_the_batch_cap() {
        let mut pacer = realtime_pacer(3);

        let batch = pacer.next_batch(Duration::from_millis(120));
        assert_eq!(batch.ticks, 3);
        assert_eq!(batch.discarded, Duration::from_millis(72));
    }

    #[test]
    fn realtime_pacer_caps_a_stalled_pass() {
        let mut pacer = realtime_pacer(100);

        let batch = pacer.next_batch(Duration::from_secs(3));
        assert_eq!(batch.ticks, 15);
        assert_eq!(batch.discarded, Duration::ZERO);
    }

    #[test]
    fn headless_pacer_runs_full_batches_without_sleeping() {
        let mut pacer = TickPacer::from_config(&headless(10), Duration::from_millis(16));

        assert_eq!(
            pacer.next_batch(Duration::ZERO),
            TickBatch {
                ticks: 5,
                discarded: Duration::ZERO,
            }
        );
        assert_eq!(pacer.idle_time(), None);
    }

    #[test]
    fn headless_run_stops_at_tick_limit() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut input = ScriptedInput::default();

        let summary =
            run_app(headless(12), CountingScene::boxed(&calls), &mut input).expect("run");

        assert_eq!(summary.ticks_run, 12);
        assert_eq!(summary.exit_reason, ExitReason::TickLimit);
        let calls = calls.borrow();
        assert_eq!((calls.loads, calls.updates, calls.unloads), (1, 12, 1));
    }

    #[test]
    fn scene_quit_ends_run_early() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut scene = CountingScene::boxed(&calls);
        scene.quit_after = Some(3);
        let mut input = ScriptedInput::default();

        let summary = run_app(headless(100), scene, &mut input).expect("run");

        assert_eq!(summary.ticks_run, 3);
        assert_eq!(summary.exit_reason, ExitReason::SceneQuit);
        assert_eq!(calls.borrow().unloads, 1);
    }

    #[test]
    fn scripted_input_reaches_the_scene() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut input = ScriptedInput::new(vec![
            ScriptedInputEvent {
                tick: 2,
                action: InputAction::MoveUp,
                pressed: true,
            },
            ScriptedInputEvent {
                tick: 4,
                action: InputAction::MoveUp,
                pressed: false,
            },
            ScriptedInputEvent {
                tick: 6,
                action: InputAction::Quit,
                pressed: true,
            },
        ]);

        let summary =
            run_app(headless(50), CountingScene::boxed(&calls), &mut input).expect("run");

        assert_eq!(summary.ticks_run, 7);
        assert_eq!(calls.borrow().movement_ticks, 2);
    }

    #[test]
    fn load_failure_is_reported_without_ticking() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let mut scene = CountingScene::boxed(&calls);
        scene.fail_load = true;
        let mut input = ScriptedInput::default();

        let error = run_app(headless(5), scene, &mut input).expect_err("load should fail");

        assert!(matches!(error, AppError::SceneLoad(_)));
        assert_eq!(calls.borrow().updates, 0);
    }

    #[test]
    fn unpaced_run_without_limit_is_rejected() {
        let calls = Rc::new(RefCell::new(Calls::default()));
        let config = LoopConfig {
            realtime: false,
            ..LoopConfig::default()
        };
        let mut input = ScriptedInput::default();

        let error =
            run_app(config, CountingScene::boxed(&calls), &mut input).expect_err("unbounded");
        assert!(matches!(error, AppError::UnboundedRun));
        assert_eq!(calls.borrow().loads, 0);
    }
}
