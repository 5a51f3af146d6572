#![forbid(unsafe_code)]

//! Scripted walk through the overlay against the settings-screen fixture.
//!
//! Run with `RUST_LOG=viewscope=trace` to see per-node verdicts.

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use viewscope_core::{FeatureFlags, GridDensity, HostContext, HostTree, NodeId, Point};
use viewscope_harness::MockTree;
use viewscope_harness::fixtures::{self, SCREEN};
use viewscope_overlay::{
    DecorationLayer, OverlayConfig, OverlayContext, OverlayCoordinator, TapOutcome,
};
use web_time::Instant;

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("viewscope=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match OverlayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(2);
        }
    };

    let mut overlay = match OverlayCoordinator::with_context(
        config,
        OverlayContext::with_flags(FeatureFlags::PANEL_VISIBLE),
    ) {
        Ok(overlay) => overlay,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(2);
        }
    };

    let (tree, ids) = fixtures::settings_screen();
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    overlay.activate(&HostContext::new(1, SCREEN), t0);
    overlay.on_tick(&tree, at(100));

    {
        let features = &mut overlay.context_mut().features;
        features.set_random_tint(true);
        features.set_dimensions(true);
        features.set_grid(true);
        features.set_grid_density(GridDensity::Medium);
        features.set_performance(true);
    }
    overlay.on_tick(&tree, at(200));
    report(&overlay);

    for frame in 0..=60 {
        overlay.on_frame(f64::from(frame) / 60.0);
    }
    if let Some(readout) = overlay.performance_readout() {
        println!("performance: {readout}");
    }

    let title_center = tree_point(&tree, ids.title);
    match overlay.handle_tap(&tree, title_center) {
        TapOutcome::Inspected(record) => println!("inspected:\n{}", record.describe()),
        other => println!("tap: {other:?}"),
    }
    println!("tap on panel: {:?}", overlay.handle_tap(&tree, Point::new(30.0, 780.0)));

    overlay.notify_layout_disrupted(at(1000));
    overlay.on_tick(&tree, at(1300));

    overlay.context_mut().features.set_visible(false);
    overlay.on_tick(&tree, at(1400));
    report(&overlay);

    let stats = overlay.stats();
    println!(
        "refreshes={} scans={} feature_changes={} taps={} inspections={}",
        stats.refreshes, stats.scans, stats.feature_changes, stats.taps, stats.inspections
    );
    overlay.deactivate();
}

fn tree_point(tree: &MockTree, node: NodeId) -> Point {
    tree.frame_in_root(node)
        .map(|f| f.center())
        .unwrap_or(Point::new(0.0, 0.0))
}

fn report(overlay: &OverlayCoordinator) {
    let Some(surface) = overlay.surface() else {
        println!("overlay inactive");
        return;
    };
    println!(
        "cycle {}: grid={} tints={} labels={}",
        overlay.cycle(),
        surface.layer(DecorationLayer::Grid).len(),
        surface.layer(DecorationLayer::Tints).len(),
        surface.layer(DecorationLayer::Labels).len(),
    );
    for label in surface.layer(DecorationLayer::Labels) {
        if let Some(text) = label.kind.text() {
            println!("  {text} at ({:.0}, {:.0})", label.frame.x, label.frame.y);
        }
    }
}
