//! Scan instrumentation.

use tracing_subscriber::layer::SubscriberExt;
use viewscope_core::Rect;
use viewscope_harness::fixtures;
use viewscope_harness::{MockNode, MockTree, TraceCapture};
use viewscope_scan::{ClassificationPolicy, collect_bounded, meaningful};

#[test]
fn scan_span_carries_root_and_summary() {
    let (tree, _) = fixtures::settings_screen();
    let (layer, handle) = TraceCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        meaningful(&tree, tree.root_id(), &ClassificationPolicy::default());
    });

    let span = handle.span_named("scan").expect("scan span");
    assert_eq!(span.fields.get("root").map(String::as_str), Some("0"));
    assert_eq!(span.parent, None);

    let complete = handle.events_with_message("scan complete");
    assert_eq!(complete.len(), 1);
    let event = &complete[0];
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(event.span.as_deref(), Some("scan"));
    assert_eq!(event.fields.get("meaningful").map(String::as_str), Some("6"));
    assert!(event.fields.get("chrome").is_some_and(|c| c != "0"));
}

#[test]
fn every_non_chrome_node_logs_a_verdict() {
    let mut tree = MockTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    let root = tree.root_id();
    tree.add(root, MockNode::new("TextLabel", Rect::new(0.0, 0.0, 40.0, 20.0)));
    tree.add(root, MockNode::view(Rect::new(0.0, 0.0, 1.0, 1.0)));
    let (layer, handle) = TraceCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        meaningful(&tree, root, &ClassificationPolicy::default());
    });

    let verdicts: Vec<_> = handle
        .events_with_message("classified")
        .into_iter()
        .filter_map(|e| e.fields.get("verdict").cloned())
        .collect();
    assert_eq!(verdicts, vec!["no_signal", "content_type", "degenerate"]);
}

#[test]
fn truncation_warns() {
    let mut tree = MockTree::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    let root = tree.root_id();
    for _ in 0..5 {
        tree.add(root, MockNode::view(Rect::new(0.0, 0.0, 10.0, 10.0)));
    }
    let (layer, handle) = TraceCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);

    let scanned = tracing::subscriber::with_default(subscriber, || collect_bounded(&tree, root, 3));

    assert_eq!(scanned.len(), 3);
    let warnings = handle.events_with_message("scan truncated at node limit");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, tracing::Level::WARN);
}
