#![forbid(unsafe_code)]

//! Overlay coordinator.
//!
//! The coordinator owns the refresh cycle: it decides what the overlay
//! currently shows from the feature configuration and the host tree.
//!
//! # Refresh protocol
//!
//! 1) Not active: nothing to do.
//! 2) Master visibility off: clear all decorations and stop. No scan.
//! 3) Clear every decoration from the previous cycle.
//! 4) Scan the host once, when tints or labels are enabled.
//! 5) Grid on: add grid lines and rulers.
//! 6) Random tint on: add one tint per meaningful node on screen, clipped
//!    to the surface, color drawn fresh.
//! 7) Dimensions on: add one label per meaningful node, centered and
//!    clamped to the surface.
//!
//! Steps 5–7 read the same scan result.
//!
//! # Driving
//!
//! The host calls [`on_tick`](OverlayCoordinator::on_tick) from its
//! low-rate periodic signal and [`on_frame`](OverlayCoordinator::on_frame)
//! from its per-frame signal. Feature changes arrive on a channel and are
//! turned into scheduled refreshes on the next tick.

use std::sync::mpsc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use viewscope_core::{
    FeatureChange, FeatureFlags, HostContext, HostTree, InspectionRecord, NodeId, Point, Rect,
    Rgba, SampleOutcome,
};
use viewscope_scan::{ClassifiedNode, meaningful};
use web_time::Instant;

use crate::config::{ConfigError, OverlayConfig};
use crate::context::OverlayContext;
use crate::grid::grid_decorations;
use crate::label::{dimension_text, place};
use crate::perf::PerformanceReadout;
use crate::schedule::RefreshScheduler;
use crate::surface::{ChromeRole, Decoration, DecorationKey, DecorationKind, OverlaySurface};

/// What a tap on the overlay did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// Overlay hidden or inactive; the host should handle the tap.
    PassThrough,
    /// The tap landed on overlay chrome.
    Chrome(ChromeRole),
    /// A host node was found and its record published.
    Inspected(InspectionRecord),
    /// Nothing under the point; existing inspection left unchanged.
    Missed,
}

/// Counters describing coordinator activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    /// Refresh cycles run, including hidden ones.
    pub refreshes: u64,
    /// Cycles that scanned the host.
    pub scans: u64,
    /// Nodes classified meaningful in the last scan.
    pub last_meaningful: usize,
    /// Decorations produced by the last cycle.
    pub last_decorations: usize,
    /// Feature changes received from the configuration feed.
    pub feature_changes: u64,
    pub taps: u64,
    pub inspections: u64,
}

/// Drives the overlay surface from configuration and host state.
#[derive(Debug)]
pub struct OverlayCoordinator {
    config: OverlayConfig,
    context: OverlayContext,
    changes: mpsc::Receiver<FeatureChange>,
    surface: Option<OverlaySurface>,
    scheduler: RefreshScheduler,
    rng: StdRng,
    cycle: u64,
    stats: RefreshStats,
}

impl OverlayCoordinator {
    /// Coordinator with a fresh context.
    pub fn new(config: OverlayConfig) -> Result<Self, ConfigError> {
        Self::with_context(config, OverlayContext::new())
    }

    /// Coordinator over an existing context.
    pub fn with_context(
        config: OverlayConfig,
        mut context: OverlayContext,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let changes = context.features.subscribe();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            scheduler: RefreshScheduler::new(config.refresh_rate.min_interval()),
            config,
            context,
            changes,
            surface: None,
            rng,
            cycle: 0,
            stats: RefreshStats::default(),
        })
    }

    /// Attach to `host_context`.
    ///
    /// Returns `false` without side effects when already active or when
    /// the context is invalid. The first refresh is deferred by the
    /// configured initial delay so the host can finish its layout pass.
    pub fn activate(&mut self, host_context: &HostContext, now: Instant) -> bool {
        if let Some(surface) = &self.surface {
            tracing::debug!(
                active = surface.handle().0,
                requested = host_context.id,
                "activate ignored: already active"
            );
            return false;
        }
        let Some(surface) = OverlaySurface::create(host_context) else {
            tracing::warn!(context = host_context.id, "activate ignored: invalid context");
            return false;
        };
        tracing::info!(
            context = host_context.id,
            level = surface.level().0,
            "overlay activated"
        );
        self.surface = Some(surface);
        self.context.timing.restart();
        self.scheduler
            .schedule_after(self.config.initial_refresh_delay, now);
        true
    }

    /// Detach from the host and drop all decorations.
    pub fn deactivate(&mut self) -> bool {
        let Some(surface) = self.surface.take() else {
            return false;
        };
        self.scheduler.cancel();
        tracing::info!(context = surface.handle().0, "overlay deactivated");
        true
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.surface.is_some()
    }

    /// Request a refresh on the next tick.
    pub fn schedule_update(&mut self) {
        self.scheduler.schedule_update();
    }

    /// An orientation change or similar event moved the host's layout.
    pub fn notify_layout_disrupted(&mut self, now: Instant) {
        tracing::debug!(
            delay_ms = self.config.layout_settle_delay.as_millis() as u64,
            "layout disrupted, refresh deferred"
        );
        self.scheduler
            .schedule_after(self.config.layout_settle_delay, now);
    }

    /// Periodic tick. Runs at most one refresh and reports whether it did.
    pub fn on_tick<H: HostTree + ?Sized>(&mut self, host: &H, now: Instant) -> bool {
        self.drain_feature_changes();
        if !self.is_active() || !self.scheduler.take_due(now) {
            return false;
        }
        self.refresh(host);
        true
    }

    fn drain_feature_changes(&mut self) {
        let mut received = 0u64;
        let mut replaced = false;
        loop {
            match self.changes.try_recv() {
                Ok(change) => {
                    received += 1;
                    tracing::trace!(?change, "feature change observed");
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    // The feature configuration was swapped out from under us.
                    self.changes = self.context.features.subscribe();
                    replaced = true;
                    tracing::debug!("feature configuration replaced, resubscribed");
                    break;
                }
            }
        }
        self.stats.feature_changes += received;
        if (received > 0 || replaced) && self.is_active() {
            self.scheduler.schedule_update();
        }
    }

    /// Run one refresh cycle now.
    pub fn refresh<H: HostTree + ?Sized>(&mut self, host: &H) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.cycle += 1;
        self.stats.refreshes += 1;
        let _span = tracing::debug_span!("refresh", cycle = self.cycle).entered();

        surface.clear_decorations();
        let features = &self.context.features;
        if !features.is_visible() {
            self.stats.last_decorations = 0;
            tracing::debug!("overlay hidden, decorations cleared");
            return;
        }

        let flags = features.flags();
        let density = features.grid_density();
        let wants_nodes = flags.intersects(FeatureFlags::RANDOM_TINT | FeatureFlags::DIMENSIONS);

        let nodes = if wants_nodes {
            match host.root() {
                Some(root) => {
                    self.stats.scans += 1;
                    meaningful(host, root, &self.config.policy)
                }
                None => {
                    tracing::debug!("host has no root, nothing to scan");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        self.stats.last_meaningful = nodes.len();

        let mut seq = 0u32;
        if flags.contains(FeatureFlags::GRID) {
            let grid = grid_decorations(surface.bounds(), density, &self.config.grid, self.cycle, seq);
            seq = seq.wrapping_add(grid.len() as u32);
            for decoration in grid {
                surface.add_decoration(decoration);
            }
        }

        let placed = placed_nodes(host, surface, &nodes);

        if flags.contains(FeatureFlags::RANDOM_TINT) {
            let bounds = surface.bounds();
            for (node, _, frame) in &placed {
                // Tints cover only the on-screen part of a node.
                let Some(frame) = frame.clipped_to(&bounds) else {
                    continue;
                };
                let color = random_tint(&mut self.rng, self.config.tint_alpha);
                surface.add_decoration(Decoration::new(
                    DecorationKey {
                        cycle: self.cycle,
                        node: Some(*node),
                        seq,
                    },
                    frame,
                    DecorationKind::Tint { color },
                ));
                seq = seq.wrapping_add(1);
            }
        }

        if flags.contains(FeatureFlags::DIMENSIONS) {
            let bounds = surface.bounds();
            for (node, size_source, frame) in &placed {
                let text = dimension_text(size_source.size());
                let label_frame = place(&text, *frame, bounds, &self.config.label);
                surface.add_decoration(Decoration::new(
                    DecorationKey {
                        cycle: self.cycle,
                        node: Some(*node),
                        seq,
                    },
                    label_frame,
                    DecorationKind::Label {
                        text,
                        style: self.config.label,
                    },
                ));
                seq = seq.wrapping_add(1);
            }
        }

        self.stats.last_decorations = surface.decoration_count();
        tracing::debug!(
            meaningful = nodes.len(),
            decorations = surface.decoration_count(),
            "refresh complete"
        );
    }

    /// Handle a tap at `point` in overlay space.
    pub fn handle_tap<H: HostTree + ?Sized>(&mut self, host: &H, point: Point) -> TapOutcome {
        self.stats.taps += 1;
        let Some(surface) = self.surface.as_ref() else {
            return TapOutcome::PassThrough;
        };
        if !self.context.features.is_visible() {
            return TapOutcome::PassThrough;
        }
        if let Some(target) = surface.hit_test(point) {
            return TapOutcome::Chrome(target.role);
        }

        let host_point = surface.to_host(point);
        let Some(node) = host.hit_test(host_point) else {
            tracing::debug!(x = point.x, y = point.y, "tap missed");
            return TapOutcome::Missed;
        };
        if let Some(role) = chrome_role_of(host, node, &self.config.policy.chrome_tags) {
            return TapOutcome::Chrome(role);
        }
        let (Some(bounds), Some(frame)) = (host.bounds(node), host.frame_in_root(node)) else {
            tracing::debug!(node = node.raw(), "tapped node has no geometry");
            return TapOutcome::Missed;
        };

        let record = InspectionRecord::capture(bounds.size(), frame);
        self.context.inspection.publish(record);
        self.stats.inspections += 1;
        TapOutcome::Inspected(record)
    }

    /// Per-frame signal from the host's display refresh, in seconds.
    pub fn on_frame(&mut self, timestamp_secs: f64) -> SampleOutcome {
        self.context.timing.on_frame(timestamp_secs)
    }

    /// Latest timing values, when the overlay and the readout are both shown.
    pub fn performance_readout(&self) -> Option<PerformanceReadout> {
        let features = &self.context.features;
        (features.is_visible() && features.is_enabled(FeatureFlags::PERFORMANCE))
            .then(|| PerformanceReadout::from(self.context.timing.stats()))
    }

    /// Hide the inspector panel and clear the record.
    pub fn dismiss_inspector(&mut self) {
        self.context.inspection.dismiss();
    }

    #[inline]
    pub fn stats(&self) -> RefreshStats {
        self.stats
    }

    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[inline]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    #[inline]
    pub fn context(&self) -> &OverlayContext {
        &self.context
    }

    /// Mutable shared state. Feature changes made here are observed on
    /// the next tick, including a wholesale replacement of `features`.
    #[inline]
    pub fn context_mut(&mut self) -> &mut OverlayContext {
        &mut self.context
    }

    #[inline]
    pub fn surface(&self) -> Option<&OverlaySurface> {
        self.surface.as_ref()
    }

    #[inline]
    pub fn surface_mut(&mut self) -> Option<&mut OverlaySurface> {
        self.surface.as_mut()
    }

    #[inline]
    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Tear down and hand back the shared context.
    pub fn into_context(mut self) -> OverlayContext {
        self.deactivate();
        self.context
    }
}

/// Meaningful nodes with their own bounds and overlay-space frame.
///
/// Nodes whose geometry is gone by now are skipped.
fn placed_nodes<H: HostTree + ?Sized>(
    host: &H,
    surface: &OverlaySurface,
    nodes: &[ClassifiedNode],
) -> Vec<(NodeId, Rect, Rect)> {
    nodes
        .iter()
        .filter_map(|n| {
            let bounds = n.bounds.or_else(|| host.bounds(n.id))?;
            let frame = host.frame_in_root(n.id)?;
            frame
                .is_finite()
                .then(|| (n.id, bounds, surface.rect_from_host(frame)))
        })
        .collect()
}

fn random_tint<R: Rng>(rng: &mut R, alpha: f32) -> Rgba {
    Rgba::from_unit(rng.r#gen(), rng.r#gen(), rng.r#gen(), alpha)
}

fn chrome_role_of<H: HostTree + ?Sized>(
    host: &H,
    node: NodeId,
    chrome_tags: &[String],
) -> Option<ChromeRole> {
    let mut seen = FxHashSet::default();
    let mut current = Some(node);
    while let Some(id) = current {
        if !seen.insert(id) {
            return None;
        }
        if let Some(tag) = host.identifier(id)
            && chrome_tags.iter().any(|t| *t == tag)
        {
            return ChromeRole::ALL.into_iter().find(|r| r.tag() == tag);
        }
        current = host.parent(id);
    }
    None
}
