#![forbid(unsafe_code)]

//! Feature toggles for the debug overlay.
//!
//! [`FeatureConfig`] is the mutable set of independent feature flags plus
//! the grid density. Any combination is valid. The control panel writes to
//! it; the coordinator observes it through a change feed obtained from
//! [`FeatureConfig::subscribe`], so changes are pushed rather than polled.
//!
//! Setters only notify when the stored value actually changes.

use std::sync::mpsc;

use bitflags::bitflags;

bitflags! {
    /// Independent overlay features.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FeatureFlags: u8 {
        /// Master visibility: the control panel is shown and visuals are produced.
        const PANEL_VISIBLE = 1 << 0;
        /// Random translucent tint over every meaningful node.
        const RANDOM_TINT = 1 << 1;
        /// Width × height labels centered on every meaningful node.
        const DIMENSIONS = 1 << 2;
        /// Coordinate grid with top/left rulers.
        const GRID = 1 << 3;
        /// Live fps / frame-time readout.
        const PERFORMANCE = 1 << 4;
    }
}

impl FeatureFlags {
    /// Stable name of a single flag, for logs.
    pub fn name(self) -> &'static str {
        const NAMES: [(FeatureFlags, &str); 5] = [
            (FeatureFlags::PANEL_VISIBLE, "panel_visible"),
            (FeatureFlags::RANDOM_TINT, "random_tint"),
            (FeatureFlags::DIMENSIONS, "dimensions"),
            (FeatureFlags::GRID, "grid"),
            (FeatureFlags::PERFORMANCE, "performance"),
        ];
        NAMES
            .iter()
            .find(|(flag, _)| *flag == self)
            .map_or("mixed", |(_, name)| *name)
    }
}

/// Spacing of the coordinate grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridDensity {
    Small,
    Medium,
    #[default]
    Large,
}

impl GridDensity {
    /// Distance between grid lines in points.
    pub const fn spacing(self) -> f64 {
        match self {
            Self::Small => 5.0,
            Self::Medium => 10.0,
            Self::Large => 20.0,
        }
    }

    /// Cycle Small → Medium → Large → Small.
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Small => Self::Medium,
            Self::Medium => Self::Large,
            Self::Large => Self::Small,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// A single observed configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureChange {
    /// One flag flipped to the given state.
    Flag { flag: FeatureFlags, enabled: bool },
    /// Grid density changed.
    GridDensity(GridDensity),
}

/// Observable feature configuration.
#[derive(Debug, Default)]
pub struct FeatureConfig {
    flags: FeatureFlags,
    grid_density: GridDensity,
    subscribers: Vec<mpsc::Sender<FeatureChange>>,
}

impl FeatureConfig {
    /// All features off, default grid density.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a given set of flags.
    #[must_use]
    pub fn with_flags(mut self, flags: FeatureFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Subscribe to change notifications.
    ///
    /// Dropping the receiver unsubscribes; dead senders are pruned on the
    /// next notification.
    pub fn subscribe(&mut self) -> mpsc::Receiver<FeatureChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Number of live subscribers (as of the last notification).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    #[inline]
    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    #[inline]
    pub fn is_enabled(&self, flag: FeatureFlags) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.is_enabled(FeatureFlags::PANEL_VISIBLE)
    }

    #[inline]
    pub fn grid_density(&self) -> GridDensity {
        self.grid_density
    }

    /// Set each flag in `flags` to `enabled`, notifying once per flag that changed.
    pub fn set(&mut self, flags: FeatureFlags, enabled: bool) {
        for flag in flags.iter() {
            if self.flags.contains(flag) == enabled {
                continue;
            }
            self.flags.set(flag, enabled);
            tracing::debug!(flag = flag.name(), enabled, "feature flag changed");
            self.notify(FeatureChange::Flag { flag, enabled });
        }
    }

    /// Flip a single flag.
    pub fn toggle(&mut self, flag: FeatureFlags) {
        let enabled = !self.flags.contains(flag);
        self.set(flag, enabled);
    }

    /// Flip master visibility.
    pub fn toggle_visible(&mut self) {
        self.toggle(FeatureFlags::PANEL_VISIBLE);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.set(FeatureFlags::PANEL_VISIBLE, visible);
    }

    pub fn set_random_tint(&mut self, enabled: bool) {
        self.set(FeatureFlags::RANDOM_TINT, enabled);
    }

    pub fn set_dimensions(&mut self, enabled: bool) {
        self.set(FeatureFlags::DIMENSIONS, enabled);
    }

    pub fn set_grid(&mut self, enabled: bool) {
        self.set(FeatureFlags::GRID, enabled);
    }

    pub fn set_performance(&mut self, enabled: bool) {
        self.set(FeatureFlags::PERFORMANCE, enabled);
    }

    pub fn set_grid_density(&mut self, density: GridDensity) {
        if self.grid_density == density {
            return;
        }
        self.grid_density = density;
        tracing::debug!(density = density.as_str(), "grid density changed");
        self.notify(FeatureChange::GridDensity(density));
    }

    fn notify(&mut self, change: FeatureChange) {
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }
}
