#![forbid(unsafe_code)]

//! Overlay surface.
//!
//! A full-screen, transparent surface stacked above the host at
//! [`SurfaceLevel::OVERLAY`]. It owns three decoration layers painted in
//! order (grid, tints, labels) and a small set of chrome controls.
//!
//! # Hit testing
//!
//! Decorations never intercept input. [`OverlaySurface::hit_test`] only
//! reports a registered chrome control; every other point returns `None`
//! so the host receives the event untouched. Controls registered later
//! are considered on top of earlier ones.
//!
//! # Coordinates
//!
//! Overlay space has its origin at the surface's top-left corner.
//! `host_origin` is where the host root's origin sits in overlay space;
//! it is zero when both share the screen.

use viewscope_core::{HostContext, NodeId, Point, Rect, Rgba, SurfaceLevel};
use viewscope_scan::{CONTROL_PANEL_TAG, INSPECTOR_TAG, PERFORMANCE_TAG};

use crate::config::LabelStyle;

/// Opaque handle naming the surface attached to one host context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// The overlay's own interactive chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromeRole {
    ControlPanel,
    Inspector,
    Performance,
}

impl ChromeRole {
    pub const ALL: [Self; 3] = [Self::ControlPanel, Self::Inspector, Self::Performance];

    /// Identifier tag the chrome root carries in the host tree.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::ControlPanel => CONTROL_PANEL_TAG,
            Self::Inspector => INSPECTOR_TAG,
            Self::Performance => PERFORMANCE_TAG,
        }
    }
}

/// Paint layer of a decoration. Later variants paint above earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecorationLayer {
    Grid,
    Tints,
    Labels,
}

/// Identity of a decoration, valid for the refresh cycle that made it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationKey {
    pub cycle: u64,
    /// Host node the decoration annotates, if any.
    pub node: Option<NodeId>,
    /// Position among the cycle's decorations.
    pub seq: u32,
}

/// Orientation of a grid line or ruler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// What a decoration draws.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationKind {
    /// Translucent fill over a node's frame.
    Tint { color: Rgba },
    /// Dimension caption.
    Label { text: String, style: LabelStyle },
    /// One grid line spanning the surface.
    GridLine { axis: Axis, color: Rgba },
    /// Background band of a ruler.
    RulerBand { axis: Axis, color: Rgba },
    /// Ruler tick with its offset caption.
    RulerTick {
        axis: Axis,
        color: Rgba,
        text: String,
    },
}

impl DecorationKind {
    pub fn layer(&self) -> DecorationLayer {
        match self {
            Self::Tint { .. } => DecorationLayer::Tints,
            Self::Label { .. } => DecorationLayer::Labels,
            Self::GridLine { .. } | Self::RulerBand { .. } | Self::RulerTick { .. } => {
                DecorationLayer::Grid
            }
        }
    }

    /// Caption text, for labels and ruler ticks.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Label { text, .. } | Self::RulerTick { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// One visual artifact on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub key: DecorationKey,
    /// Frame in overlay space.
    pub frame: Rect,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn new(key: DecorationKey, frame: Rect, kind: DecorationKind) -> Self {
        Self { key, frame, kind }
    }

    #[inline]
    pub fn layer(&self) -> DecorationLayer {
        self.kind.layer()
    }

    /// Everything visible about the decoration except per-cycle identity
    /// and random tint color.
    pub fn signature(&self) -> DecorationSignature {
        DecorationSignature {
            layer: self.layer(),
            node: self.key.node,
            frame: [self.frame.x, self.frame.y, self.frame.width, self.frame.height]
                .map(f64::to_bits),
            text: self.kind.text().map(str::to_owned),
        }
    }
}

/// Cycle-independent description of a decoration, for comparing refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationSignature {
    pub layer: DecorationLayer,
    pub node: Option<NodeId>,
    frame: [u64; 4],
    pub text: Option<String>,
}

/// Result of a successful surface hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTarget {
    pub role: ChromeRole,
    pub frame: Rect,
}

/// Transparent overlay surface above one host context.
#[derive(Debug, Clone)]
pub struct OverlaySurface {
    handle: SurfaceHandle,
    context: HostContext,
    bounds: Rect,
    host_origin: Point,
    grid: Vec<Decoration>,
    tints: Vec<Decoration>,
    labels: Vec<Decoration>,
    controls: Vec<(ChromeRole, Rect)>,
}

impl OverlaySurface {
    /// Create a surface covering `context`'s screen.
    ///
    /// Returns `None` for an invalid context.
    pub fn create(context: &HostContext) -> Option<Self> {
        if !context.is_valid() {
            tracing::debug!(context = context.id, "surface not created: invalid context");
            return None;
        }
        Some(Self {
            handle: SurfaceHandle(context.id),
            context: *context,
            bounds: Rect::from_size(context.screen.size()),
            host_origin: Point::ZERO,
            grid: Vec::new(),
            tints: Vec::new(),
            labels: Vec::new(),
            controls: Vec::new(),
        })
    }

    #[inline]
    pub fn handle(&self) -> SurfaceHandle {
        self.handle
    }

    #[inline]
    pub fn context(&self) -> &HostContext {
        &self.context
    }

    /// Stacking level: strictly above host alert chrome.
    #[inline]
    pub fn level(&self) -> SurfaceLevel {
        SurfaceLevel::OVERLAY
    }

    /// Surface bounds in overlay space.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn host_origin(&self) -> Point {
        self.host_origin
    }

    pub fn set_host_origin(&mut self, origin: Point) {
        self.host_origin = origin;
    }

    /// Overlay space to host root space.
    #[inline]
    pub fn to_host(&self, point: Point) -> Point {
        point.offset(-self.host_origin.x, -self.host_origin.y)
    }

    /// Host root space to overlay space.
    #[inline]
    pub fn from_host(&self, point: Point) -> Point {
        point.offset(self.host_origin.x, self.host_origin.y)
    }

    pub fn rect_from_host(&self, rect: Rect) -> Rect {
        rect.translate(self.host_origin.x, self.host_origin.y)
    }

    /// Register or move a chrome control.
    pub fn register_control(&mut self, role: ChromeRole, frame: Rect) {
        self.controls.retain(|(r, _)| *r != role);
        self.controls.push((role, frame));
    }

    pub fn unregister_control(&mut self, role: ChromeRole) {
        self.controls.retain(|(r, _)| *r != role);
    }

    pub fn control_frame(&self, role: ChromeRole) -> Option<Rect> {
        self.controls
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, frame)| *frame)
    }

    /// Topmost chrome control under `point`, or `None` to pass through.
    pub fn hit_test(&self, point: Point) -> Option<SurfaceTarget> {
        if !point.is_finite() || !self.bounds.contains(point) {
            return None;
        }
        self.controls
            .iter()
            .rev()
            .find(|(_, frame)| frame.contains(point))
            .map(|(role, frame)| SurfaceTarget {
                role: *role,
                frame: *frame,
            })
    }

    /// Remove every decoration from every layer. Controls stay.
    pub fn clear_decorations(&mut self) {
        let removed = self.decoration_count();
        self.grid.clear();
        self.tints.clear();
        self.labels.clear();
        if removed > 0 {
            tracing::trace!(removed, "decorations cleared");
        }
    }

    pub fn add_decoration(&mut self, decoration: Decoration) {
        match decoration.layer() {
            DecorationLayer::Grid => self.grid.push(decoration),
            DecorationLayer::Tints => self.tints.push(decoration),
            DecorationLayer::Labels => self.labels.push(decoration),
        }
    }

    pub fn layer(&self, layer: DecorationLayer) -> &[Decoration] {
        match layer {
            DecorationLayer::Grid => &self.grid,
            DecorationLayer::Tints => &self.tints,
            DecorationLayer::Labels => &self.labels,
        }
    }

    /// All decorations in paint order.
    pub fn decorations(&self) -> impl Iterator<Item = &Decoration> {
        self.grid.iter().chain(&self.tints).chain(&self.labels)
    }

    pub fn decoration_count(&self) -> usize {
        self.grid.len() + self.tints.len() + self.labels.len()
    }

    pub fn is_clear(&self) -> bool {
        self.decoration_count() == 0
    }

    /// Sorted signatures of everything currently drawn.
    pub fn visible_set(&self) -> Vec<DecorationSignature> {
        let mut set: Vec<_> = self.decorations().map(Decoration::signature).collect();
        set.sort();
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> OverlaySurface {
        OverlaySurface::create(&HostContext::new(7, Rect::new(0.0, 0.0, 390.0, 844.0)))
            .expect("valid context")
    }

    fn tint(seq: u32, frame: Rect) -> Decoration {
        Decoration::new(
            DecorationKey {
                cycle: 1,
                node: Some(NodeId::new(u64::from(seq))),
                seq,
            },
            frame,
            DecorationKind::Tint { color: Rgba::RED },
        )
    }

    #[test]
    fn invalid_context_creates_nothing() {
        assert!(OverlaySurface::create(&HostContext::new(1, Rect::ZERO)).is_none());
    }

    #[test]
    fn level_is_above_alerts() {
        let s = surface();
        assert_eq!(s.level(), SurfaceLevel::OVERLAY);
        assert!(s.level().is_above(SurfaceLevel::ALERT));
        assert_eq!(s.handle(), SurfaceHandle(7));
    }

    #[test]
    fn decorations_never_intercept() {
        let mut s = surface();
        s.add_decoration(tint(0, Rect::new(0.0, 0.0, 390.0, 844.0)));
        assert_eq!(s.hit_test(Point::new(100.0, 100.0)), None);
    }

    #[test]
    fn controls_intercept_topmost_first() {
        let mut s = surface();
        s.register_control(ChromeRole::ControlPanel, Rect::new(10.0, 760.0, 370.0, 60.0));
        s.register_control(ChromeRole::Inspector, Rect::new(10.0, 700.0, 370.0, 100.0));

        let hit = s.hit_test(Point::new(50.0, 780.0)).map(|t| t.role);
        assert_eq!(hit, Some(ChromeRole::Inspector));
        let hit = s.hit_test(Point::new(50.0, 810.0)).map(|t| t.role);
        assert_eq!(hit, Some(ChromeRole::ControlPanel));
        assert_eq!(s.hit_test(Point::new(50.0, 50.0)), None);
    }

    #[test]
    fn reregister_moves_control() {
        let mut s = surface();
        s.register_control(ChromeRole::Performance, Rect::new(0.0, 0.0, 10.0, 10.0));
        s.register_control(ChromeRole::Performance, Rect::new(100.0, 100.0, 10.0, 10.0));
        assert_eq!(s.hit_test(Point::new(5.0, 5.0)), None);
        assert!(s.hit_test(Point::new(105.0, 105.0)).is_some());
        s.unregister_control(ChromeRole::Performance);
        assert!(s.hit_test(Point::new(105.0, 105.0)).is_none());
    }

    #[test]
    fn outside_bounds_and_nan_pass_through() {
        let mut s = surface();
        s.register_control(ChromeRole::ControlPanel, Rect::new(-100.0, -100.0, 1000.0, 1000.0));
        assert_eq!(s.hit_test(Point::new(-5.0, 5.0)), None);
        assert_eq!(s.hit_test(Point::new(f64::NAN, 5.0)), None);
    }

    #[test]
    fn layers_and_clear() {
        let mut s = surface();
        s.add_decoration(tint(0, Rect::new(0.0, 0.0, 10.0, 10.0)));
        s.add_decoration(Decoration::new(
            DecorationKey {
                cycle: 1,
                node: None,
                seq: 1,
            },
            Rect::new(0.0, 0.0, 0.5, 844.0),
            DecorationKind::GridLine {
                axis: Axis::Vertical,
                color: Rgba::BLUE,
            },
        ));
        assert_eq!(s.layer(DecorationLayer::Tints).len(), 1);
        assert_eq!(s.layer(DecorationLayer::Grid).len(), 1);
        let order: Vec<_> = s.decorations().map(Decoration::layer).collect();
        assert_eq!(order, vec![DecorationLayer::Grid, DecorationLayer::Tints]);

        s.register_control(ChromeRole::ControlPanel, Rect::new(0.0, 0.0, 10.0, 10.0));
        s.clear_decorations();
        assert!(s.is_clear());
        assert!(s.control_frame(ChromeRole::ControlPanel).is_some());
    }

    #[test]
    fn coordinate_conversion_round_trips() {
        let mut s = surface();
        s.set_host_origin(Point::new(0.0, 20.0));
        let p = Point::new(30.0, 40.0);
        assert_eq!(s.to_host(p), Point::new(30.0, 20.0));
        assert_eq!(s.from_host(s.to_host(p)), p);
        assert_eq!(
            s.rect_from_host(Rect::new(1.0, 2.0, 3.0, 4.0)),
            Rect::new(1.0, 22.0, 3.0, 4.0)
        );
    }

    #[test]
    fn signature_ignores_cycle_and_color() {
        let a = tint(3, Rect::new(1.0, 2.0, 3.0, 4.0));
        let mut b = a.clone();
        b.key.cycle = 99;
        b.kind = DecorationKind::Tint { color: Rgba::BLUE };
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn chrome_tags_match_scanner() {
        assert_eq!(ChromeRole::Inspector.tag(), INSPECTOR_TAG);
        assert_eq!(ChromeRole::ALL.len(), 3);
    }
}
