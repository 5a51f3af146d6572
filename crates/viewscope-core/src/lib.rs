#![forbid(unsafe_code)]

//! Core: geometry, host-tree bindings, feature state, inspection, and frame timing.
//!
//! Everything in this crate is a leaf with respect to the overlay engine.
//! The scanner and coordinator build on these types; none of them touch
//! the host tree except through [`host::HostTree`].

pub mod color;
pub mod features;
pub mod geometry;
pub mod host;
pub mod inspection;
pub mod timing;

pub use color::Rgba;
pub use features::{FeatureChange, FeatureConfig, FeatureFlags, GridDensity};
pub use geometry::{Insets, Point, Rect, Size};
pub use host::{HostContext, HostTree, LayerPaint, NodeId, SurfaceLevel};
pub use inspection::{InspectionRecord, InspectionState};
pub use timing::{FrameStats, FrameTimingMonitor, SampleOutcome};
