#![forbid(unsafe_code)]

//! Viewscope public facade crate.
//!
//! Re-exports the types a host integration needs from the internal crates
//! and offers a small prelude. A typical binding implements
//! [`HostTree`] for its render tree, builds an [`OverlayCoordinator`] with
//! [`attach`], and forwards ticks, frame callbacks and taps to it.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use viewscope_core::{
    FeatureChange, FeatureConfig, FeatureFlags, FrameStats, FrameTimingMonitor, GridDensity,
    HostContext, HostTree, InspectionRecord, InspectionState, Insets, LayerPaint, NodeId, Point,
    Rect, Rgba, SampleOutcome, Size, SurfaceLevel,
};

// --- Scan re-exports -------------------------------------------------------

pub use viewscope_scan::{
    ClassificationPolicy, ClassifiedNode, Exclusion, Inclusion, Verdict, is_debug_chrome,
    meaningful,
};

// --- Overlay re-exports ----------------------------------------------------

pub use viewscope_overlay::{
    ChromeRole, ConfigError, Decoration, DecorationKind, DecorationLayer, FrameRateRange,
    LabelStyle, OverlayConfig, OverlayContext, OverlayCoordinator, OverlaySurface,
    PerformanceReadout, RefreshStats, TapOutcome,
};

/// Clock type taken by time-driven entry points.
pub use web_time::Instant;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for overlay integrations.
#[derive(Debug)]
pub enum Error {
    /// Rejected configuration or environment override.
    Config(ConfigError),
    /// The host context cannot carry an overlay surface.
    InvalidHostContext(u64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::InvalidHostContext(id) => write!(f, "host context {id} has no usable screen"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::InvalidHostContext(_) => None,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for viewscope APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a coordinator from `config` with `flags` enabled and activate it
/// on `host_context`.
///
/// Returns [`Error::InvalidHostContext`] when the context has a zero or
/// non-finite screen, so the caller learns about it instead of getting a
/// silently inactive overlay.
pub fn attach(
    config: OverlayConfig,
    flags: FeatureFlags,
    host_context: &HostContext,
    now: Instant,
) -> Result<OverlayCoordinator> {
    if !host_context.is_valid() {
        return Err(Error::InvalidHostContext(host_context.id));
    }
    let mut overlay = OverlayCoordinator::with_context(config, OverlayContext::with_flags(flags))?;
    overlay.activate(host_context, now);
    Ok(overlay)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FeatureFlags, HostContext, HostTree, Instant, NodeId, OverlayConfig,
        OverlayCoordinator, Point, Rect, Result, TapOutcome, attach,
    };

    pub use crate::{core, overlay, scan};
}

pub use viewscope_core as core;
pub use viewscope_overlay as overlay;
pub use viewscope_scan as scan;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn config_error_converts_and_keeps_source() {
        let err: Error = ConfigError::InvalidTintAlpha(2.0).into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), ConfigError::InvalidTintAlpha(2.0).to_string());
    }

    #[test]
    fn attach_rejects_invalid_context() {
        let result = attach(
            OverlayConfig::default(),
            FeatureFlags::PANEL_VISIBLE,
            &HostContext::new(9, Rect::ZERO),
            Instant::now(),
        );
        assert!(matches!(result, Err(Error::InvalidHostContext(9))));
    }

    #[test]
    fn attach_propagates_config_error() {
        let result = attach(
            OverlayConfig::default().with_tint_alpha(-1.0),
            FeatureFlags::PANEL_VISIBLE,
            &HostContext::new(1, Rect::new(0.0, 0.0, 390.0, 844.0)),
            Instant::now(),
        );
        assert!(matches!(result, Err(Error::Config(ConfigError::InvalidTintAlpha(_)))));
    }

    #[test]
    fn attach_activates() {
        let overlay = attach(
            OverlayConfig::default(),
            FeatureFlags::PANEL_VISIBLE,
            &HostContext::new(1, Rect::new(0.0, 0.0, 390.0, 844.0)),
            Instant::now(),
        )
        .expect("valid attach");
        assert!(overlay.is_active());
    }
}
