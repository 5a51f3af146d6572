#![forbid(unsafe_code)]

//! Depth-first traversal and per-node classification.
//!
//! A scan walks the host tree once, pre-order, and reduces it to the nodes
//! worth annotating. Classification applies ordered rules and the first
//! match wins:
//!
//! | # | Rule | Verdict |
//! |---|------|---------|
//! | 1 | type matches the container denylist | [`Exclusion::Container`] |
//! | 2 | either bounds dimension below `min_visible`, or no bounds | [`Exclusion::Degenerate`] |
//! | 3 | hidden, or opacity not strictly positive | [`Exclusion::Invisible`] |
//! | 4 | explicit non-clear fill | [`Inclusion::ExplicitFill`] |
//! | 5 | type matches the content allowlist | [`Inclusion::ContentType`] |
//! | 6 | backing layer has visible background or contents | [`Inclusion::LayerPaint`] |
//! | 7 | any sublayer has a background or contents | [`Inclusion::SublayerPaint`] |
//! | 8 | no children | [`Inclusion::Leaf`] |
//! | - | otherwise | [`Exclusion::NoSignal`] |
//!
//! Chrome exclusion is independent of the rules above: a node whose own
//! identifier, or any ancestor's, is a reserved chrome tag is never
//! meaningful.
//!
//! Nothing here mutates the host. A node whose geometry cannot be read
//! contributes nothing.

use rustc_hash::FxHashSet;
use viewscope_core::{HostTree, NodeId, Rect};

use crate::policy::{ClassificationPolicy, DEFAULT_MAX_NODES};

/// One node reached by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedNode {
    pub id: NodeId,
    /// Distance from the scan root (root = 0).
    pub depth: u32,
    /// Index of the parent within the same scan, `None` for the root.
    pub parent: Option<usize>,
}

/// Why a node was excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exclusion {
    Container,
    Degenerate,
    Invisible,
    NoSignal,
}

/// Why a node was included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Inclusion {
    ExplicitFill,
    ContentType,
    LayerPaint,
    SublayerPaint,
    Leaf,
}

/// Outcome of the ordered classification rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Excluded(Exclusion),
    Included(Inclusion),
}

impl Verdict {
    #[inline]
    pub fn is_included(self) -> bool {
        matches!(self, Self::Included(_))
    }

    /// Short stable name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excluded(Exclusion::Container) => "container",
            Self::Excluded(Exclusion::Degenerate) => "degenerate",
            Self::Excluded(Exclusion::Invisible) => "invisible",
            Self::Excluded(Exclusion::NoSignal) => "no_signal",
            Self::Included(Inclusion::ExplicitFill) => "explicit_fill",
            Self::Included(Inclusion::ContentType) => "content_type",
            Self::Included(Inclusion::LayerPaint) => "layer_paint",
            Self::Included(Inclusion::SublayerPaint) => "sublayer_paint",
            Self::Included(Inclusion::Leaf) => "leaf",
        }
    }
}

/// A scanned node with its per-refresh verdicts.
///
/// Valid for one refresh only: host identity and geometry may change
/// before the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedNode {
    pub id: NodeId,
    pub depth: u32,
    pub verdict: Verdict,
    /// The node is overlay chrome or lies inside it.
    pub is_chrome: bool,
    /// Bounds in the node's own space, as read during classification.
    pub bounds: Option<Rect>,
}

impl ClassifiedNode {
    /// Included by the rules and not chrome.
    #[inline]
    pub fn is_meaningful(&self) -> bool {
        self.verdict.is_included() && !self.is_chrome
    }
}

/// Every node under `root`, root included, in depth-first pre-order.
pub fn collect_all<H: HostTree + ?Sized>(host: &H, root: NodeId) -> Vec<ScannedNode> {
    collect_bounded(host, root, DEFAULT_MAX_NODES)
}

/// Like [`collect_all`], stopping after `max_nodes` nodes.
///
/// A node reachable twice (a malformed binding reporting a cycle or a
/// shared child) is visited once.
pub fn collect_bounded<H: HostTree + ?Sized>(
    host: &H,
    root: NodeId,
    max_nodes: usize,
) -> Vec<ScannedNode> {
    let mut out = Vec::new();
    let mut seen = FxHashSet::default();
    let mut stack = vec![ScannedNode {
        id: root,
        depth: 0,
        parent: None,
    }];

    while let Some(node) = stack.pop() {
        if out.len() >= max_nodes {
            tracing::warn!(max_nodes, "scan truncated at node limit");
            break;
        }
        if !seen.insert(node.id) {
            tracing::trace!(node = node.id.raw(), "node reached twice, skipped");
            continue;
        }
        let index = out.len();
        out.push(node);

        // Reverse so the first child is popped first.
        for child in host.children(node.id).into_iter().rev() {
            stack.push(ScannedNode {
                id: child,
                depth: node.depth + 1,
                parent: Some(index),
            });
        }
    }
    out
}

/// Whether `node` or any ancestor carries a reserved chrome tag.
pub fn is_debug_chrome<H: HostTree + ?Sized>(
    host: &H,
    node: NodeId,
    policy: &ClassificationPolicy,
) -> bool {
    let mut seen = FxHashSet::default();
    let mut current = Some(node);
    while let Some(id) = current {
        if !seen.insert(id) {
            return false;
        }
        if has_chrome_tag(host, id, policy) {
            return true;
        }
        current = host.parent(id);
    }
    false
}

fn has_chrome_tag<H: HostTree + ?Sized>(
    host: &H,
    node: NodeId,
    policy: &ClassificationPolicy,
) -> bool {
    host.identifier(node)
        .is_some_and(|tag| policy.is_chrome_tag(&tag))
}

/// Apply the ordered rules to one node.
pub fn evaluate<H: HostTree + ?Sized>(
    host: &H,
    node: NodeId,
    policy: &ClassificationPolicy,
) -> (Verdict, Option<Rect>) {
    let type_name = host.type_name(node);
    if policy.is_container(&type_name) {
        return (Verdict::Excluded(Exclusion::Container), None);
    }

    let bounds = host.bounds(node);
    match bounds {
        Some(b) if !b.is_degenerate(policy.min_visible) => {}
        _ => return (Verdict::Excluded(Exclusion::Degenerate), bounds),
    }

    let opacity = host.opacity(node);
    if host.is_hidden(node) || opacity.is_nan() || opacity <= 0.0 {
        return (Verdict::Excluded(Exclusion::Invisible), bounds);
    }

    if host.fill(node).is_some_and(|c| !c.is_clear()) {
        return (Verdict::Included(Inclusion::ExplicitFill), bounds);
    }

    if policy.is_content(&type_name) {
        return (Verdict::Included(Inclusion::ContentType), bounds);
    }

    let layer = host.layer_paint(node);
    if layer.has_visible_background() || layer.has_contents {
        return (Verdict::Included(Inclusion::LayerPaint), bounds);
    }

    if host.sublayer_paints(node).iter().any(|p| p.is_painted()) {
        return (Verdict::Included(Inclusion::SublayerPaint), bounds);
    }

    if host.children(node).is_empty() {
        return (Verdict::Included(Inclusion::Leaf), bounds);
    }

    (Verdict::Excluded(Exclusion::NoSignal), bounds)
}

/// Classify one scanned node, walking its ancestors for chrome tags.
pub fn classify<H: HostTree + ?Sized>(
    host: &H,
    node: &ScannedNode,
    policy: &ClassificationPolicy,
) -> ClassifiedNode {
    let (verdict, bounds) = evaluate(host, node.id, policy);
    ClassifiedNode {
        id: node.id,
        depth: node.depth,
        verdict,
        is_chrome: is_debug_chrome(host, node.id, policy),
        bounds,
    }
}

/// Classify every node under `root` and keep the meaningful ones.
///
/// Chrome is resolved during the walk: a node inherits its parent's chrome
/// status, so the ancestor chain is never re-read per node. Nodes inside
/// chrome skip rule evaluation entirely.
pub fn meaningful<H: HostTree + ?Sized>(
    host: &H,
    root: NodeId,
    policy: &ClassificationPolicy,
) -> Vec<ClassifiedNode> {
    let _span = tracing::debug_span!("scan", root = root.raw()).entered();

    let scanned = collect_bounded(host, root, policy.max_nodes);
    // The scan root may itself sit inside chrome.
    let root_in_chrome = host
        .parent(root)
        .is_some_and(|p| is_debug_chrome(host, p, policy));

    let mut chrome = Vec::with_capacity(scanned.len());
    let mut out = Vec::new();
    let mut chrome_count = 0usize;

    for node in &scanned {
        let inherited = match node.parent {
            Some(i) => chrome.get(i).copied().unwrap_or(false),
            None => root_in_chrome,
        };
        let is_chrome = inherited || has_chrome_tag(host, node.id, policy);
        chrome.push(is_chrome);
        if is_chrome {
            chrome_count += 1;
            continue;
        }

        let (verdict, bounds) = evaluate(host, node.id, policy);
        tracing::trace!(node = node.id.raw(), verdict = verdict.as_str(), "classified");
        if verdict.is_included() {
            out.push(ClassifiedNode {
                id: node.id,
                depth: node.depth,
                verdict,
                is_chrome: false,
                bounds,
            });
        }
    }

    tracing::debug!(
        nodes = scanned.len(),
        chrome = chrome_count,
        meaningful = out.len(),
        "scan complete"
    );
    out
}
