#![forbid(unsafe_code)]

//! Test host and demo support for viewscope.
//!
//! - [`MockTree`]: an in-memory [`HostTree`](viewscope_core::HostTree)
//!   with parent-relative frames, topmost hit testing and read counting.
//! - [`TraceCapture`]: a tracing layer for asserting on logged spans.
//! - [`fixtures`]: canned trees shaped like a small settings screen with
//!   the overlay's own chrome mounted on top.

pub mod capture;
pub mod tree;

pub use capture::{CaptureHandle, CapturedEvent, CapturedSpan, TraceCapture};
pub use tree::{MockNode, MockTree};

pub mod fixtures {
    //! Canned host trees.

    use viewscope_core::{LayerPaint, NodeId, Rect, Rgba};
    use viewscope_scan::{CONTROL_PANEL_TAG, INSPECTOR_TAG, PERFORMANCE_TAG};

    use crate::tree::{MockNode, MockTree};

    /// Phone-sized screen used by the fixtures.
    pub const SCREEN: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);

    /// Handles into [`settings_screen`].
    #[derive(Debug, Clone, Copy)]
    pub struct SettingsScreen {
        pub hosting: NodeId,
        pub content: NodeId,
        pub card: NodeId,
        pub title: NodeId,
        pub toggle: NodeId,
        pub divider: NodeId,
        pub avatar: NodeId,
        pub hidden_badge: NodeId,
        pub faded: NodeId,
        pub drawn: NodeId,
        pub panel: NodeId,
        pub panel_button: NodeId,
        pub inspector: NodeId,
        pub perf: NodeId,
    }

    /// A small settings screen plus overlay chrome.
    ///
    /// The title label sits at root-space (200, 300) with size 120 × 40.
    pub fn settings_screen() -> (MockTree, SettingsScreen) {
        let mut tree = MockTree::new(SCREEN);
        let root = tree.root_id();

        let hosting = tree.add(root, MockNode::new("_PlatformHostingView", SCREEN));
        let content = tree.add(hosting, MockNode::view(Rect::new(0.0, 0.0, 390.0, 844.0)));
        let card = tree.add(
            content,
            MockNode::view(Rect::new(100.0, 200.0, 280.0, 300.0)).fill(Rgba::WHITE),
        );
        let title = tree.add(
            card,
            MockNode::new("TextLabel", Rect::new(100.0, 100.0, 120.0, 40.0)),
        );
        let toggle = tree.add(
            card,
            MockNode::new("Switch", Rect::new(20.0, 160.0, 51.0, 31.0)),
        );
        let divider = tree.add(
            card,
            MockNode::view(Rect::new(0.0, 150.0, 280.0, 1.0)).fill(Rgba::BLACK),
        );
        let avatar = tree.add(
            content,
            MockNode::new("ImageView", Rect::new(20.0, 40.0, 64.0, 64.0)),
        );
        let hidden_badge = tree.add(
            content,
            MockNode::new("TextLabel", Rect::new(300.0, 40.0, 30.0, 20.0)).hidden(),
        );
        let faded = tree.add(
            content,
            MockNode::new("TextLabel", Rect::new(300.0, 70.0, 30.0, 20.0)).opacity(0.0),
        );
        let drawn = tree.add(
            content,
            MockNode::view(Rect::new(20.0, 600.0, 200.0, 100.0)).sublayer(LayerPaint {
                background: None,
                has_contents: true,
            }),
        );
        tree.add(
            drawn,
            MockNode::view(Rect::new(0.0, 0.0, 200.0, 100.0)).layer(LayerPaint {
                background: Some(Rgba::CLEAR),
                has_contents: false,
            }),
        );

        let panel = tree.add(
            root,
            MockNode::view(Rect::new(10.0, 760.0, 370.0, 60.0))
                .fill(Rgba::BLACK.with_alpha(200))
                .identifier(CONTROL_PANEL_TAG),
        );
        let panel_button = tree.add(
            panel,
            MockNode::new("Button", Rect::new(10.0, 10.0, 80.0, 40.0)),
        );
        let inspector = tree.add(
            root,
            MockNode::view(Rect::new(10.0, 560.0, 370.0, 180.0))
                .fill(Rgba::WHITE)
                .identifier(INSPECTOR_TAG)
                .hidden(),
        );
        let perf = tree.add(
            root,
            MockNode::new("TextLabel", Rect::new(280.0, 60.0, 100.0, 24.0))
                .identifier(PERFORMANCE_TAG),
        );

        (
            tree,
            SettingsScreen {
                hosting,
                content,
                card,
                title,
                toggle,
                divider,
                avatar,
                hidden_badge,
                faded,
                drawn,
                panel,
                panel_button,
                inspector,
                perf,
            },
        )
    }
}
