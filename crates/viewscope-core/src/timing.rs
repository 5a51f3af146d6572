#![forbid(unsafe_code)]

//! Frame timing monitor.
//!
//! Samples the host's "frame completed" signal and publishes a rolling fps
//! and mean frame time.
//!
//! # Accumulation
//!
//! Each sample adds its elapsed time to an accumulator. Every
//! [`WINDOW_FRAMES`] samples the window is reduced to
//!
//! ```text
//! fps           = count / accumulated
//! frame_time_ms = accumulated / count * 1000
//! ```
//!
//! and the accumulator is reset, whether or not the result is accepted.
//!
//! # Invariants
//!
//! - The accumulator never divides by zero: a window whose accumulated time
//!   is not strictly positive is discarded.
//! - Published values are finite, positive, `fps <= 120` and
//!   `frame_time_ms <= 1000`. A rejected window leaves the previous
//!   published values unchanged.
//! - After construction or [`FrameTimingMonitor::restart`], the first
//!   timestamp only establishes a baseline.

/// Samples per published window.
pub const WINDOW_FRAMES: u32 = 30;
/// Upper bound for a published fps value.
pub const MAX_FPS: f64 = 120.0;
/// Upper bound for a published mean frame time.
pub const MAX_FRAME_TIME_MS: f64 = 1000.0;

/// Published timing statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub fps: f64,
    pub frame_time_ms: f64,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            fps: 60.0,
            frame_time_ms: 0.0,
        }
    }
}

impl FrameStats {
    fn is_sane(&self) -> bool {
        self.fps.is_finite()
            && self.frame_time_ms.is_finite()
            && self.fps > 0.0
            && self.frame_time_ms > 0.0
            && self.fps <= MAX_FPS
            && self.frame_time_ms <= MAX_FRAME_TIME_MS
    }
}

/// Outcome of recording one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleOutcome {
    /// The sample only set the baseline timestamp.
    Baseline,
    /// The sample was accumulated; the window is not full yet.
    Accumulated,
    /// The window closed and its values were published.
    Published(FrameStats),
    /// The window closed but its values were out of bounds and discarded.
    Rejected,
}

/// Rolling fps / frame-time estimator.
#[derive(Debug, Clone, Default)]
pub struct FrameTimingMonitor {
    last_timestamp: Option<f64>,
    frame_count: u32,
    accumulated: f64,
    stats: FrameStats,
    windows_published: u64,
    windows_rejected: u64,
}

impl FrameTimingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a display-refresh timestamp in seconds.
    ///
    /// The first timestamp after (re)start establishes the baseline and
    /// contributes no measurement.
    pub fn on_frame(&mut self, timestamp_secs: f64) -> SampleOutcome {
        let Some(last) = self.last_timestamp.replace(timestamp_secs) else {
            return SampleOutcome::Baseline;
        };
        self.record_elapsed(timestamp_secs - last)
    }

    /// Feed one elapsed-time measurement in seconds.
    pub fn record_elapsed(&mut self, elapsed_secs: f64) -> SampleOutcome {
        self.frame_count += 1;
        self.accumulated += elapsed_secs;

        if self.frame_count < WINDOW_FRAMES {
            return SampleOutcome::Accumulated;
        }

        let count = f64::from(self.frame_count);
        let accumulated = self.accumulated;
        self.frame_count = 0;
        self.accumulated = 0.0;

        if accumulated.is_nan() || accumulated <= 0.0 {
            self.windows_rejected += 1;
            tracing::trace!(accumulated, "timing window discarded: no elapsed time");
            return SampleOutcome::Rejected;
        }

        let candidate = FrameStats {
            fps: count / accumulated,
            frame_time_ms: (accumulated / count) * 1000.0,
        };
        if candidate.is_sane() {
            self.stats = candidate;
            self.windows_published += 1;
            SampleOutcome::Published(candidate)
        } else {
            self.windows_rejected += 1;
            tracing::trace!(
                fps = candidate.fps,
                frame_time_ms = candidate.frame_time_ms,
                "timing window discarded: out of bounds"
            );
            SampleOutcome::Rejected
        }
    }

    /// Forget the baseline and any partial window. Published values are kept.
    pub fn restart(&mut self) {
        self.last_timestamp = None;
        self.frame_count = 0;
        self.accumulated = 0.0;
    }

    /// Latest published statistics.
    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Samples accumulated in the current, unpublished window.
    #[inline]
    pub fn pending_samples(&self) -> u32 {
        self.frame_count
    }

    #[inline]
    pub fn windows_published(&self) -> u64 {
        self.windows_published
    }

    #[inline]
    pub fn windows_rejected(&self) -> u64 {
        self.windows_rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn steady_16ms_publishes_after_thirty() {
        let mut monitor = FrameTimingMonitor::new();
        let mut published = 0;
        for i in 0..45 {
            let outcome = monitor.record_elapsed(0.016);
            if let SampleOutcome::Published(stats) = outcome {
                published += 1;
                assert_eq!(i, 29);
                assert!(approx(stats.fps, 62.5));
                assert!(approx(stats.frame_time_ms, 16.0));
            }
        }
        assert_eq!(published, 1);
        assert_eq!(monitor.pending_samples(), 15);
        assert!(approx(monitor.stats().fps, 62.5));
    }

    #[test]
    fn single_zero_sample_is_not_published() {
        let mut monitor = FrameTimingMonitor::new();
        let before = monitor.stats();
        assert_eq!(monitor.record_elapsed(0.0), SampleOutcome::Accumulated);
        assert_eq!(monitor.stats(), before);
    }

    #[test]
    fn zero_window_is_rejected_and_retains_previous() {
        let mut monitor = FrameTimingMonitor::new();
        for _ in 0..WINDOW_FRAMES {
            monitor.record_elapsed(0.016);
        }
        let good = monitor.stats();

        let mut last = SampleOutcome::Accumulated;
        for _ in 0..WINDOW_FRAMES {
            last = monitor.record_elapsed(0.0);
        }
        assert_eq!(last, SampleOutcome::Rejected);
        assert_eq!(monitor.stats(), good);
        assert_eq!(monitor.pending_samples(), 0);
    }

    #[test]
    fn out_of_band_windows_are_rejected() {
        let mut monitor = FrameTimingMonitor::new();
        // 1 ms frames -> 1000 fps.
        for _ in 0..WINDOW_FRAMES {
            monitor.record_elapsed(0.001);
        }
        assert_eq!(monitor.stats(), FrameStats::default());

        // 2 s frames -> 2000 ms.
        for _ in 0..WINDOW_FRAMES {
            monitor.record_elapsed(2.0);
        }
        assert_eq!(monitor.stats(), FrameStats::default());
        assert_eq!(monitor.windows_rejected(), 2);
    }

    #[test]
    fn non_finite_window_is_rejected() {
        let mut monitor = FrameTimingMonitor::new();
        monitor.record_elapsed(f64::NAN);
        for _ in 1..WINDOW_FRAMES {
            monitor.record_elapsed(0.016);
        }
        assert_eq!(monitor.stats(), FrameStats::default());
        assert_eq!(monitor.windows_published(), 0);
    }

    #[test]
    fn first_timestamp_is_baseline_only() {
        let mut monitor = FrameTimingMonitor::new();
        assert_eq!(monitor.on_frame(10.0), SampleOutcome::Baseline);
        assert_eq!(monitor.pending_samples(), 0);

        let mut ts = 10.0;
        let mut outcome = SampleOutcome::Baseline;
        for _ in 0..WINDOW_FRAMES {
            ts += 0.02;
            outcome = monitor.on_frame(ts);
        }
        match outcome {
            SampleOutcome::Published(stats) => {
                assert!((stats.fps - 50.0).abs() < 1e-6);
                assert!((stats.frame_time_ms - 20.0).abs() < 1e-6);
            }
            other => panic!("expected publish, got {other:?}"),
        }
    }

    #[test]
    fn restart_resets_baseline_and_window() {
        let mut monitor = FrameTimingMonitor::new();
        monitor.on_frame(1.0);
        monitor.on_frame(1.016);
        assert_eq!(monitor.pending_samples(), 1);

        monitor.restart();
        assert_eq!(monitor.pending_samples(), 0);
        assert_eq!(monitor.on_frame(5.0), SampleOutcome::Baseline);
    }

    #[test]
    fn backwards_clock_window_is_rejected() {
        let mut monitor = FrameTimingMonitor::new();
        monitor.on_frame(100.0);
        let mut ts = 100.0;
        for _ in 0..WINDOW_FRAMES {
            ts -= 0.016;
            monitor.on_frame(ts);
        }
        assert_eq!(monitor.stats(), FrameStats::default());
    }
}
