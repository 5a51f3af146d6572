#![forbid(unsafe_code)]

//! Overlay configuration.
//!
//! [`OverlayConfig`] gathers every tunable of the coordinator. Defaults
//! reproduce the reference behavior: refresh at 5–15 Hz (10 preferred),
//! first refresh 100 ms after activation, 300 ms settle delay after a
//! layout disruption, tint alpha 0.3.
//!
//! # Environment overrides
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `VIEWSCOPE_REFRESH_HZ` | `refresh_rate.preferred_hz` | positive number |
//! | `VIEWSCOPE_SEED` | `seed` | unsigned integer |
//! | `VIEWSCOPE_TINT_ALPHA` | `tint_alpha` | number in `0..=1` |
//!
//! A preferred rate outside the configured range widens the range to
//! include it.

use std::fmt;
use std::time::Duration;

use viewscope_core::{Insets, Rgba};
use viewscope_scan::ClassificationPolicy;

use crate::grid::GridStyle;

/// Environment variable overriding the preferred refresh rate.
pub const ENV_REFRESH_HZ: &str = "VIEWSCOPE_REFRESH_HZ";
/// Environment variable fixing the tint color seed.
pub const ENV_SEED: &str = "VIEWSCOPE_SEED";
/// Environment variable overriding the tint alpha.
pub const ENV_TINT_ALPHA: &str = "VIEWSCOPE_TINT_ALPHA";

/// Configuration rejected by [`OverlayConfig::validate`] or an override.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Rates must be positive, finite and ordered `min <= preferred <= max`.
    InvalidRefreshRate {
        min_hz: f64,
        max_hz: f64,
        preferred_hz: f64,
    },
    /// Minimum visible size must be finite and non-negative.
    InvalidMinVisible(f64),
    /// Tint alpha must lie in `0.0..=1.0`.
    InvalidTintAlpha(f32),
    /// A label or grid metric was not finite and positive.
    InvalidStyle { field: &'static str, value: f64 },
    /// An environment override could not be parsed.
    Env {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRefreshRate {
                min_hz,
                max_hz,
                preferred_hz,
            } => write!(
                f,
                "invalid refresh rate range: min {min_hz} Hz, max {max_hz} Hz, preferred {preferred_hz} Hz"
            ),
            Self::InvalidMinVisible(v) => write!(f, "invalid minimum visible size: {v}"),
            Self::InvalidTintAlpha(a) => write!(f, "tint alpha {a} outside 0..=1"),
            Self::InvalidStyle { field, value } => write!(f, "invalid {field}: {value}"),
            Self::Env {
                var,
                value,
                expected,
            } => write!(f, "{var}={value} ({expected})"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Refresh tick rate bounds, in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameRateRange {
    pub min_hz: f64,
    pub max_hz: f64,
    pub preferred_hz: f64,
}

impl Default for FrameRateRange {
    fn default() -> Self {
        Self {
            min_hz: 5.0,
            max_hz: 15.0,
            preferred_hz: 10.0,
        }
    }
}

impl FrameRateRange {
    pub const fn new(min_hz: f64, max_hz: f64, preferred_hz: f64) -> Self {
        Self {
            min_hz,
            max_hz,
            preferred_hz,
        }
    }

    /// Set the preferred rate, widening the range if needed.
    #[must_use]
    pub fn with_preferred(mut self, hz: f64) -> Self {
        self.preferred_hz = hz;
        self.min_hz = self.min_hz.min(hz);
        self.max_hz = self.max_hz.max(hz);
        self
    }

    /// Shortest allowed gap between two refreshes.
    pub fn min_interval(&self) -> Duration {
        hz_to_period(self.max_hz)
    }

    /// Tick period at the preferred rate.
    pub fn preferred_interval(&self) -> Duration {
        hz_to_period(self.preferred_hz)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let all_positive = [self.min_hz, self.max_hz, self.preferred_hz]
            .iter()
            .all(|hz| hz.is_finite() && *hz > 0.0);
        if all_positive && self.min_hz <= self.preferred_hz && self.preferred_hz <= self.max_hz {
            Ok(())
        } else {
            Err(ConfigError::InvalidRefreshRate {
                min_hz: self.min_hz,
                max_hz: self.max_hz,
                preferred_hz: self.preferred_hz,
            })
        }
    }
}

fn hz_to_period(hz: f64) -> Duration {
    if hz.is_finite() && hz > 0.0 {
        Duration::from_secs_f64(1.0 / hz)
    } else {
        Duration::ZERO
    }
}

/// Appearance of dimension labels.
///
/// Text is measured in terminal-style columns times a fixed glyph advance,
/// which is enough to size a small monospaced caption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Horizontal advance per text column.
    pub glyph_advance: f64,
    pub line_height: f64,
    pub padding: Insets,
    pub background: Rgba,
    pub foreground: Rgba,
    pub corner_radius: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            glyph_advance: 7.0,
            line_height: 14.0,
            padding: Insets::symmetric(4.0, 2.0),
            background: Rgba::BLACK.with_alpha(179),
            foreground: Rgba::WHITE,
            corner_radius: 4.0,
        }
    }
}

impl LabelStyle {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("label.glyph_advance", self.glyph_advance)?;
        positive("label.line_height", self.line_height)?;
        Ok(())
    }
}

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    /// Refresh tick rate bounds.
    pub refresh_rate: FrameRateRange,
    /// Delay before the first refresh after activation.
    pub initial_refresh_delay: Duration,
    /// Delay after an orientation change or similar layout disruption.
    pub layout_settle_delay: Duration,
    /// Alpha of random tint decorations.
    pub tint_alpha: f32,
    pub label: LabelStyle,
    pub grid: GridStyle,
    /// Classification tables used by each scan.
    pub policy: ClassificationPolicy,
    /// Seed for tint colors. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            refresh_rate: FrameRateRange::default(),
            initial_refresh_delay: Duration::from_millis(100),
            layout_settle_delay: Duration::from_millis(300),
            tint_alpha: 0.3,
            label: LabelStyle::default(),
            grid: GridStyle::default(),
            policy: ClassificationPolicy::default(),
            seed: None,
        }
    }
}

impl OverlayConfig {
    #[must_use]
    pub fn with_refresh_rate(mut self, range: FrameRateRange) -> Self {
        self.refresh_rate = range;
        self
    }

    #[must_use]
    pub fn with_initial_refresh_delay(mut self, delay: Duration) -> Self {
        self.initial_refresh_delay = delay;
        self
    }

    #[must_use]
    pub fn with_layout_settle_delay(mut self, delay: Duration) -> Self {
        self.layout_settle_delay = delay;
        self
    }

    #[must_use]
    pub fn with_tint_alpha(mut self, alpha: f32) -> Self {
        self.tint_alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_label_style(mut self, label: LabelStyle) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub fn with_grid_style(mut self, grid: GridStyle) -> Self {
        self.grid = grid;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: ClassificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Defaults with environment overrides applied, then validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a custom lookup (for tests), then validate.
    pub fn apply_env_with<F>(mut self, get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = get(ENV_REFRESH_HZ) {
            match value.trim().parse::<f64>() {
                Ok(hz) if hz.is_finite() && hz > 0.0 => {
                    self.refresh_rate = self.refresh_rate.with_preferred(hz);
                }
                _ => {
                    return Err(ConfigError::Env {
                        var: ENV_REFRESH_HZ,
                        value,
                        expected: "positive number",
                    });
                }
            }
        }

        if let Some(value) = get(ENV_SEED) {
            match value.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => {
                    return Err(ConfigError::Env {
                        var: ENV_SEED,
                        value,
                        expected: "unsigned integer",
                    });
                }
            }
        }

        if let Some(value) = get(ENV_TINT_ALPHA) {
            match value.trim().parse::<f32>() {
                Ok(alpha) if (0.0..=1.0).contains(&alpha) => self.tint_alpha = alpha,
                _ => {
                    return Err(ConfigError::Env {
                        var: ENV_TINT_ALPHA,
                        value,
                        expected: "number in 0..=1",
                    });
                }
            }
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.refresh_rate.validate()?;
        if !(0.0..=1.0).contains(&self.tint_alpha) {
            return Err(ConfigError::InvalidTintAlpha(self.tint_alpha));
        }
        let min_visible = self.policy.min_visible;
        if !min_visible.is_finite() || min_visible < 0.0 {
            return Err(ConfigError::InvalidMinVisible(min_visible));
        }
        self.label.validate()?;
        positive("grid.line_width", self.grid.line_width)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidStyle { field, value })
    }
}
