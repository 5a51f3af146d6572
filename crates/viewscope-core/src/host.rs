#![forbid(unsafe_code)]

//! Platform binding for the host application's render tree.
//!
//! The host owns its tree exclusively. Everything here is read-only: the
//! overlay asks questions about nodes through [`HostTree`] and never holds
//! on to a node across refresh cycles. [`NodeId`] is an opaque handle that
//! is only meaningful to the binding that produced it, and only until the
//! host next mutates its tree.

use crate::color::Rgba;
use crate::geometry::{Point, Rect};

/// Opaque handle to one element of the host's live render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a handle from a raw binding value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw binding value.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Paint information for a node's backing layer, or one of its sublayers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerPaint {
    /// Layer background, if one is set.
    pub background: Option<Rgba>,
    /// Whether the layer carries a drawable content payload (bitmap, display list).
    pub has_contents: bool,
}

impl LayerPaint {
    /// A layer with neither background nor contents.
    pub const EMPTY: Self = Self {
        background: None,
        has_contents: false,
    };

    /// Whether the background is present and not fully transparent.
    #[inline]
    pub fn has_visible_background(&self) -> bool {
        self.background.is_some_and(|c| !c.is_clear())
    }

    /// Whether a sublayer counts as painted: any background at all, or contents.
    #[inline]
    pub fn is_painted(&self) -> bool {
        self.background.is_some() || self.has_contents
    }
}

/// Read access to the host's render tree.
///
/// Implementations must be cheap to query repeatedly; a refresh cycle reads
/// every node once. Methods returning `Option` return `None` when the node
/// no longer exists or has no geometry, and callers treat that as "nothing
/// to contribute" rather than an error.
pub trait HostTree {
    /// Root of the currently rendered tree.
    fn root(&self) -> Option<NodeId>;

    /// Children in back-to-front order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Parent of `node`, `None` for the root or a detached node.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Bounds in the node's own coordinate space.
    fn bounds(&self, node: NodeId) -> Option<Rect>;

    /// Bounds translated into the shared root coordinate space.
    fn frame_in_root(&self, node: NodeId) -> Option<Rect>;

    fn is_hidden(&self, node: NodeId) -> bool;

    /// Opacity in `0.0..=1.0`.
    fn opacity(&self, node: NodeId) -> f32;

    /// Explicit fill color, if the node declares one.
    fn fill(&self, node: NodeId) -> Option<Rgba>;

    /// Resolved type or role name, e.g. `"TextLabel"`.
    fn type_name(&self, node: NodeId) -> String;

    /// Identifier tag attached by the application, if any.
    fn identifier(&self, node: NodeId) -> Option<String>;

    /// Paint state of the node's backing layer.
    fn layer_paint(&self, node: NodeId) -> LayerPaint {
        let _ = node;
        LayerPaint::EMPTY
    }

    /// Paint state of the backing layer's sublayers.
    fn sublayer_paints(&self, node: NodeId) -> Vec<LayerPaint> {
        let _ = node;
        Vec::new()
    }

    /// Topmost node under `point` (root coordinate space).
    fn hit_test(&self, point: Point) -> Option<NodeId>;
}

/// Identifies one host surface the overlay can attach to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostContext {
    /// Stable identifier for the host surface (window, scene, canvas).
    pub id: u64,
    /// Screen-space rectangle of the host surface.
    pub screen: Rect,
}

impl HostContext {
    /// Create a new host context.
    pub const fn new(id: u64, screen: Rect) -> Self {
        Self { id, screen }
    }

    /// A context is usable when its screen rectangle is finite and non-empty.
    pub fn is_valid(&self) -> bool {
        self.screen.is_finite() && !self.screen.is_empty()
    }
}

/// Stacking level of a surface relative to the host's own layers.
///
/// Higher levels render above lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceLevel(pub i32);

impl SurfaceLevel {
    /// Regular application content.
    pub const NORMAL: Self = Self(0);
    /// Status bar chrome.
    pub const STATUS_BAR: Self = Self(1000);
    /// System alert chrome.
    pub const ALERT: Self = Self(2000);
    /// The debug overlay: strictly above alerts.
    pub const OVERLAY: Self = Self(Self::ALERT.0 + 100);

    /// Whether this level renders above `other`.
    #[inline]
    pub fn is_above(self, other: Self) -> bool {
        self > other
    }
}
