#![forbid(unsafe_code)]

//! Overlay surface and coordinator.
//!
//! [`OverlayCoordinator`] keeps a transparent [`OverlaySurface`] in sync
//! with the host tree and the feature configuration. The host drives it
//! with two signals and forwards taps:
//!
//! ```ignore
//! let mut overlay = OverlayCoordinator::new(OverlayConfig::from_env()?)?;
//! overlay.activate(&host_context, Instant::now());
//!
//! // Low-rate periodic signal (5–15 Hz).
//! overlay.on_tick(&host, Instant::now());
//! // Per-frame display signal.
//! overlay.on_frame(timestamp_secs);
//! // Tap delivered to the overlay.
//! match overlay.handle_tap(&host, point) {
//!     TapOutcome::PassThrough | TapOutcome::Missed => forward_to_host(point),
//!     _ => {}
//! }
//! ```

pub mod config;
pub mod context;
pub mod coordinator;
pub mod grid;
pub mod label;
pub mod perf;
pub mod schedule;
pub mod surface;

pub use config::{
    ConfigError, ENV_REFRESH_HZ, ENV_SEED, ENV_TINT_ALPHA, FrameRateRange, LabelStyle,
    OverlayConfig,
};
pub use context::OverlayContext;
pub use coordinator::{OverlayCoordinator, RefreshStats, TapOutcome};
pub use grid::GridStyle;
pub use perf::PerformanceReadout;
pub use schedule::RefreshScheduler;
pub use surface::{
    Axis, ChromeRole, Decoration, DecorationKey, DecorationKind, DecorationLayer,
    DecorationSignature, OverlaySurface, SurfaceHandle, SurfaceTarget,
};
