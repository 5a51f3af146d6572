#![forbid(unsafe_code)]

//! Shared overlay state.
//!
//! The feature configuration, the current inspection and the frame timing
//! monitor live in one explicitly constructed context handed to the
//! coordinator. All writes happen on the coordinator's thread.

use viewscope_core::{FeatureConfig, FeatureFlags, FrameTimingMonitor, InspectionState};

/// State shared between the control panel, the inspector and the coordinator.
#[derive(Debug, Default)]
pub struct OverlayContext {
    pub features: FeatureConfig,
    pub inspection: InspectionState,
    pub timing: FrameTimingMonitor,
}

impl OverlayContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose features start from `flags`.
    pub fn with_flags(flags: FeatureFlags) -> Self {
        Self {
            features: FeatureConfig::new().with_flags(flags),
            ..Self::default()
        }
    }
}
