#![forbid(unsafe_code)]

//! Performance readout.

use std::fmt;

use viewscope_core::FrameStats;

/// Latest published fps and mean frame time, ready for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceReadout {
    pub fps: f64,
    pub frame_time_ms: f64,
}

impl From<FrameStats> for PerformanceReadout {
    fn from(stats: FrameStats) -> Self {
        Self {
            fps: stats.fps,
            frame_time_ms: stats.frame_time_ms,
        }
    }
}

impl PerformanceReadout {
    /// One-line summary, e.g. `"60 FPS · 16.7 ms"`.
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PerformanceReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} FPS · {:.1} ms", self.fps, self.frame_time_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_readout() {
        let readout = PerformanceReadout::from(FrameStats::default());
        assert_eq!(readout.line(), "60 FPS · 0.0 ms");
    }

    #[test]
    fn rounds_for_display() {
        let readout = PerformanceReadout {
            fps: 59.9,
            frame_time_ms: 16.69,
        };
        assert_eq!(readout.line(), "60 FPS · 16.7 ms");
    }
}
