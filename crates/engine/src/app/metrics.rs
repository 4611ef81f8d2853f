use std::time::{Duration, Instant};

/// Loop rates averaged over one reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    /// Loop passes per second. Headless runs make one pass per tick batch.
    pub fps: f32,
    pub tps: f32,
    /// Mean wall time between passes.
    pub frame_time_ms: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    passes: u32,
    ticks: u32,
    pass_time: Duration,
}

#[derive(Debug)]
pub(crate) struct RateWindow {
    opened_at: Instant,
    length: Duration,
    counts: Counts,
}

impl RateWindow {
    pub(crate) fn open(opened_at: Instant, length: Duration) -> Self {
        Self {
            opened_at,
            length,
            counts: Counts::default(),
        }
    }

    pub(crate) fn record_pass(&mut self, pass_dt: Duration, ticks: u32) {
        let counts = &mut self.counts;
        counts.passes = counts.passes.saturating_add(1);
        counts.ticks = counts.ticks.saturating_add(ticks);
        counts.pass_time = counts.pass_time.saturating_add(pass_dt);
    }

    /// Returns the window's rates and starts a new window once `length` has
    /// passed since it opened.
    pub(crate) fn close_if_due(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.opened_at);
        if elapsed < self.length {
            return None;
        }

        let counts = std::mem::take(&mut self.counts);
        self.opened_at = now;

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match counts.passes {
            0 => 0.0,
            passes => counts.pass_time.as_secs_f32() * 1000.0 / passes as f32,
        };
        Some(LoopMetricsSnapshot {
            fps: counts.passes as f32 / seconds,
            tps: counts.ticks as f32 / seconds,
            frame_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_stays_open_until_its_length_passes() {
        let start = Instant::now();
        let mut window = RateWindow::open(start, Duration::from_secs(1));
        window.record_pass(Duration::from_millis(16), 1);

        assert!(window
            .close_if_due(start + Duration::from_millis(500))
            .is_none());
    }

    #[test]
    fn closing_reports_rates_and_starts_fresh() {
        let start = Instant::now();
        let mut window = RateWindow::open(start, Duration::from_secs(1));
        for _ in 0..30 {
            window.record_pass(Duration::from_millis(20), 2);
        }

        let rates = window
            .close_if_due(start + Duration::from_secs(1))
            .expect("rates");
        assert!((rates.tps - 60.0).abs() < 0.01);
        assert!((rates.fps - 30.0).abs() < 0.01);
        assert!((rates.frame_time_ms - 20.0).abs() < 0.01);

        let idle = window
            .close_if_due(start + Duration::from_secs(2))
            .expect("idle window");
        assert_eq!(idle, LoopMetricsSnapshot::default());
    }
}
