#![forbid(unsafe_code)]

//! In-memory host tree.
//!
//! [`MockTree`] is an arena of [`MockNode`]s addressed by [`NodeId`]. Each
//! node's frame is relative to its parent, mirroring how view-based
//! toolkits store geometry; [`HostTree::frame_in_root`] sums the chain.
//!
//! Reads are counted so tests can assert that a code path did not touch
//! the tree at all.

use std::cell::Cell;

use viewscope_core::{HostTree, LayerPaint, NodeId, Point, Rect, Rgba};

/// Attributes of one mock node.
#[derive(Debug, Clone, PartialEq)]
pub struct MockNode {
    pub type_name: String,
    /// Frame in the parent's coordinate space.
    pub frame: Rect,
    pub hidden: bool,
    pub opacity: f32,
    pub fill: Option<Rgba>,
    pub identifier: Option<String>,
    pub layer: LayerPaint,
    pub sublayers: Vec<LayerPaint>,
}

impl MockNode {
    pub fn new(type_name: impl Into<String>, frame: Rect) -> Self {
        Self {
            type_name: type_name.into(),
            frame,
            hidden: false,
            opacity: 1.0,
            fill: None,
            identifier: None,
            layer: LayerPaint::EMPTY,
            sublayers: Vec::new(),
        }
    }

    /// A plain view with no paint signal.
    pub fn view(frame: Rect) -> Self {
        Self::new("View", frame)
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn fill(mut self, color: Rgba) -> Self {
        self.fill = Some(color);
        self
    }

    #[must_use]
    pub fn identifier(mut self, tag: impl Into<String>) -> Self {
        self.identifier = Some(tag.into());
        self
    }

    #[must_use]
    pub fn layer(mut self, layer: LayerPaint) -> Self {
        self.layer = layer;
        self
    }

    #[must_use]
    pub fn sublayer(mut self, layer: LayerPaint) -> Self {
        self.sublayers.push(layer);
        self
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: MockNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    removed: bool,
}

/// Arena-backed [`HostTree`] for tests and the demo.
#[derive(Debug, Clone)]
pub struct MockTree {
    slots: Vec<Slot>,
    reads: Cell<u64>,
}

impl MockTree {
    /// Tree with a single root node covering `screen`.
    pub fn new(screen: Rect) -> Self {
        Self::with_root(MockNode::new("Window", screen))
    }

    pub fn with_root(root: MockNode) -> Self {
        Self {
            slots: vec![Slot {
                node: root,
                parent: None,
                children: Vec::new(),
                removed: false,
            }],
            reads: Cell::new(0),
        }
    }

    #[inline]
    pub fn root_id(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Append `node` as the frontmost child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live node of this tree.
    pub fn add(&mut self, parent: NodeId, node: MockNode) -> NodeId {
        assert!(self.live(parent).is_some(), "parent {parent:?} not in tree");
        let id = NodeId::new(self.slots.len() as u64);
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            children: Vec::new(),
            removed: false,
        });
        if let Some(slot) = self.slots.get_mut(parent.raw() as usize) {
            slot.children.push(id);
        }
        id
    }

    /// Detach `node` and its subtree. Handles to removed nodes read as absent.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.live(node).and_then(|s| s.parent) else {
            return;
        };
        if let Some(slot) = self.slots.get_mut(parent.raw() as usize) {
            slot.children.retain(|c| *c != node);
        }
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(slot) = self.slots.get_mut(id.raw() as usize) {
                slot.removed = true;
                stack.extend(slot.children.iter().copied());
            }
        }
    }

    /// Mutable access to a live node's attributes.
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut MockNode> {
        self.slots
            .get_mut(node.raw() as usize)
            .filter(|s| !s.removed)
            .map(|s| &mut s.node)
    }

    pub fn node(&self, node: NodeId) -> Option<&MockNode> {
        self.live(node).map(|s| &s.node)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| !s.removed).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tree reads since construction or the last [`reset_reads`](Self::reset_reads).
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }

    pub fn reset_reads(&self) {
        self.reads.set(0);
    }

    fn live(&self, node: NodeId) -> Option<&Slot> {
        self.slots
            .get(usize::try_from(node.raw()).ok()?)
            .filter(|s| !s.removed)
    }

    fn read(&self, node: NodeId) -> Option<&Slot> {
        self.reads.set(self.reads.get() + 1);
        self.live(node)
    }

    fn origin_in_root(&self, node: NodeId) -> Option<Point> {
        let mut x = 0.0;
        let mut y = 0.0;
        let mut current = Some(node);
        while let Some(id) = current {
            let slot = self.live(id)?;
            // The root's frame is the screen; its own origin is the root space.
            if slot.parent.is_none() {
                break;
            }
            x += slot.node.frame.x;
            y += slot.node.frame.y;
            current = slot.parent;
        }
        Some(Point::new(x, y))
    }

    fn hit_node(&self, id: NodeId, point: Point) -> Option<NodeId> {
        let slot = self.live(id)?;
        if slot.node.hidden || slot.node.opacity <= 0.0 {
            return None;
        }
        let frame = self.frame_of(id)?;
        if !frame.contains(point) {
            return None;
        }
        // Frontmost child first.
        slot.children
            .iter()
            .rev()
            .find_map(|child| self.hit_node(*child, point))
            .or(Some(id))
    }

    fn frame_of(&self, node: NodeId) -> Option<Rect> {
        let slot = self.live(node)?;
        let origin = self.origin_in_root(node)?;
        Some(Rect::from_origin_size(origin, slot.node.frame.size()))
    }
}

impl HostTree for MockTree {
    fn root(&self) -> Option<NodeId> {
        self.read(self.root_id()).map(|_| self.root_id())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.read(node)
            .map(|s| s.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.read(node).and_then(|s| s.parent)
    }

    fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.read(node)
            .map(|s| Rect::from_size(s.node.frame.size()))
    }

    fn frame_in_root(&self, node: NodeId) -> Option<Rect> {
        self.read(node)?;
        self.frame_of(node)
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.read(node).is_none_or(|s| s.node.hidden)
    }

    fn opacity(&self, node: NodeId) -> f32 {
        self.read(node).map_or(0.0, |s| s.node.opacity)
    }

    fn fill(&self, node: NodeId) -> Option<Rgba> {
        self.read(node).and_then(|s| s.node.fill)
    }

    fn type_name(&self, node: NodeId) -> String {
        self.read(node)
            .map(|s| s.node.type_name.clone())
            .unwrap_or_default()
    }

    fn identifier(&self, node: NodeId) -> Option<String> {
        self.read(node).and_then(|s| s.node.identifier.clone())
    }

    fn layer_paint(&self, node: NodeId) -> LayerPaint {
        self.read(node).map_or(LayerPaint::EMPTY, |s| s.node.layer)
    }

    fn sublayer_paints(&self, node: NodeId) -> Vec<LayerPaint> {
        self.read(node)
            .map(|s| s.node.sublayers.clone())
            .unwrap_or_default()
    }

    fn hit_test(&self, point: Point) -> Option<NodeId> {
        self.reads.set(self.reads.get() + 1);
        self.hit_node(self.root_id(), point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 800.0)
    }

    #[test]
    fn frame_in_root_sums_parent_origins() {
        let mut tree = MockTree::new(screen());
        let root = tree.root_id();
        let card = tree.add(root, MockNode::view(Rect::new(100.0, 200.0, 200.0, 200.0)));
        let label = tree.add(card, MockNode::new("Label", Rect::new(100.0, 100.0, 120.0, 40.0)));

        assert_eq!(tree.frame_in_root(label), Some(Rect::new(200.0, 300.0, 120.0, 40.0)));
        assert_eq!(tree.bounds(label), Some(Rect::new(0.0, 0.0, 120.0, 40.0)));
        assert_eq!(tree.frame_in_root(root), Some(screen()));
    }

    #[test]
    fn hit_test_prefers_frontmost_deepest() {
        let mut tree = MockTree::new(screen());
        let root = tree.root_id();
        let back = tree.add(root, MockNode::view(Rect::new(0.0, 0.0, 200.0, 200.0)));
        let front = tree.add(root, MockNode::view(Rect::new(50.0, 50.0, 100.0, 100.0)));
        let inner = tree.add(front, MockNode::view(Rect::new(10.0, 10.0, 20.0, 20.0)));

        assert_eq!(tree.hit_test(Point::new(65.0, 65.0)), Some(inner));
        assert_eq!(tree.hit_test(Point::new(100.0, 100.0)), Some(front));
        assert_eq!(tree.hit_test(Point::new(10.0, 10.0)), Some(back));
        assert_eq!(tree.hit_test(Point::new(390.0, 790.0)), Some(root));
        assert_eq!(tree.hit_test(Point::new(-1.0, 0.0)), None);
    }

    #[test]
    fn hidden_subtree_is_skipped_by_hit_test() {
        let mut tree = MockTree::new(screen());
        let root = tree.root_id();
        tree.add(root, MockNode::view(Rect::new(0.0, 0.0, 100.0, 100.0)).hidden());
        assert_eq!(tree.hit_test(Point::new(5.0, 5.0)), Some(root));
    }

    #[test]
    fn removed_nodes_read_as_absent() {
        let mut tree = MockTree::new(screen());
        let root = tree.root_id();
        let a = tree.add(root, MockNode::view(Rect::new(0.0, 0.0, 10.0, 10.0)));
        let b = tree.add(a, MockNode::view(Rect::new(0.0, 0.0, 5.0, 5.0)));
        tree.remove(a);

        assert!(tree.children(root).is_empty());
        assert_eq!(tree.bounds(b), None);
        assert!(tree.is_hidden(b));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn reads_are_counted() {
        let mut tree = MockTree::new(screen());
        let root = tree.root_id();
        tree.add(root, MockNode::view(Rect::new(0.0, 0.0, 10.0, 10.0)));
        tree.reset_reads();
        assert_eq!(tree.reads(), 0);
        let _ = tree.children(root);
        let _ = tree.type_name(root);
        assert_eq!(tree.reads(), 2);
    }
}
