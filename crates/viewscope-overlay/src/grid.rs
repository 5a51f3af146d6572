#![forbid(unsafe_code)]

//! Coordinate grid and rulers.
//!
//! Lines are emitted at every multiple of the density's spacing from the
//! surface origin, both edges included when they fall on a multiple. The
//! top ruler runs along the width, the left ruler along the height; each
//! tick is captioned with its offset in points.

use viewscope_core::{GridDensity, Rect, Rgba};

use crate::surface::{Axis, Decoration, DecorationKey, DecorationKind};

/// Appearance of the grid and rulers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    pub line_color: Rgba,
    pub line_width: f64,
    pub ruler_color: Rgba,
    /// Height of the top ruler band.
    pub top_ruler_extent: f64,
    /// Width of the left ruler band.
    pub left_ruler_extent: f64,
    pub tick_color: Rgba,
    pub tick_length: f64,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            line_color: Rgba::BLUE.with_alpha(77),
            line_width: 0.5,
            ruler_color: Rgba::BLACK.with_alpha(128),
            top_ruler_extent: 20.0,
            left_ruler_extent: 40.0,
            tick_color: Rgba::RED.with_alpha(179),
            tick_length: 8.0,
        }
    }
}

/// Upper bound on lines emitted along one axis.
pub const MAX_LINES_PER_AXIS: u64 = 10_000;

/// Offsets `0, spacing, 2 * spacing, ...` up to and including `extent`,
/// at most [`MAX_LINES_PER_AXIS`] of them.
pub fn line_offsets(extent: f64, spacing: f64) -> impl Iterator<Item = f64> {
    let count = if extent.is_finite() && extent >= 0.0 && spacing > 0.0 {
        let steps = (extent / spacing).floor();
        if steps >= MAX_LINES_PER_AXIS as f64 {
            MAX_LINES_PER_AXIS
        } else {
            steps as u64 + 1
        }
    } else {
        0
    };
    (0..count).map(move |i| i as f64 * spacing)
}

/// Grid lines, ruler bands and ruler ticks covering `bounds`.
///
/// `cycle` and `first_seq` seed the decoration keys; the returned
/// decorations are numbered consecutively.
pub fn grid_decorations(
    bounds: Rect,
    density: GridDensity,
    style: &GridStyle,
    cycle: u64,
    first_seq: u32,
) -> Vec<Decoration> {
    let spacing = density.spacing();
    let mut out = Vec::new();
    let mut seq = first_seq;
    let mut push = |frame: Rect, kind: DecorationKind| {
        out.push(Decoration::new(
            DecorationKey {
                cycle,
                node: None,
                seq,
            },
            frame,
            kind,
        ));
        seq = seq.wrapping_add(1);
    };

    for x in line_offsets(bounds.width, spacing) {
        push(
            Rect::new(bounds.x + x, bounds.y, style.line_width, bounds.height),
            DecorationKind::GridLine {
                axis: Axis::Vertical,
                color: style.line_color,
            },
        );
    }
    for y in line_offsets(bounds.height, spacing) {
        push(
            Rect::new(bounds.x, bounds.y + y, bounds.width, style.line_width),
            DecorationKind::GridLine {
                axis: Axis::Horizontal,
                color: style.line_color,
            },
        );
    }

    push(
        Rect::new(bounds.x, bounds.y, bounds.width, style.top_ruler_extent),
        DecorationKind::RulerBand {
            axis: Axis::Horizontal,
            color: style.ruler_color,
        },
    );
    push(
        Rect::new(bounds.x, bounds.y, style.left_ruler_extent, bounds.height),
        DecorationKind::RulerBand {
            axis: Axis::Vertical,
            color: style.ruler_color,
        },
    );

    for x in line_offsets(bounds.width, spacing) {
        push(
            Rect::new(bounds.x + x, bounds.y, 1.0, style.tick_length),
            DecorationKind::RulerTick {
                axis: Axis::Horizontal,
                color: style.tick_color,
                text: format!("{}", x as i64),
            },
        );
    }
    for y in line_offsets(bounds.height, spacing) {
        push(
            Rect::new(bounds.x, bounds.y + y, style.tick_length, 1.0),
            DecorationKind::RulerTick {
                axis: Axis::Vertical,
                color: style.tick_color,
                text: format!("{}", y as i64),
            },
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DecorationLayer;

    #[test]
    fn offsets_include_both_edges_on_multiples() {
        let xs: Vec<_> = line_offsets(60.0, 20.0).collect();
        assert_eq!(xs, vec![0.0, 20.0, 40.0, 60.0]);
        let xs: Vec<_> = line_offsets(59.0, 20.0).collect();
        assert_eq!(xs, vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn degenerate_extent_has_no_lines() {
        assert_eq!(line_offsets(f64::NAN, 20.0).count(), 0);
        assert_eq!(line_offsets(-1.0, 20.0).count(), 0);
        assert_eq!(line_offsets(100.0, 0.0).count(), 0);
    }

    #[test]
    fn oversized_extent_is_capped() {
        assert_eq!(line_offsets(f64::MAX, 5.0).count() as u64, MAX_LINES_PER_AXIS);
        assert_eq!(line_offsets(1e9, 20.0).count() as u64, MAX_LINES_PER_AXIS);
        let last = line_offsets(f64::MAX, 5.0).last();
        assert_eq!(last, Some((MAX_LINES_PER_AXIS - 1) as f64 * 5.0));
    }

    #[test]
    fn huge_screen_grid_stays_bounded() {
        let bounds = Rect::new(0.0, 0.0, f64::MAX, 100.0);
        let decorations = grid_decorations(bounds, GridDensity::Small, &GridStyle::default(), 1, 0);
        let horizontal = 100 / 5 + 1;
        let cap = MAX_LINES_PER_AXIS as usize;
        assert_eq!(decorations.len(), 2 * (cap + horizontal) + 2);
    }

    #[test]
    fn large_grid_on_phone_screen() {
        let bounds = Rect::new(0.0, 0.0, 390.0, 844.0);
        let decorations = grid_decorations(bounds, GridDensity::Large, &GridStyle::default(), 1, 0);

        let vertical = 390 / 20 + 1;
        let horizontal = 844 / 20 + 1;
        assert_eq!(decorations.len(), 2 * (vertical + horizontal) + 2);
        assert!(decorations.iter().all(|d| d.layer() == DecorationLayer::Grid));

        let ticks: Vec<_> = decorations
            .iter()
            .filter_map(|d| match &d.kind {
                DecorationKind::RulerTick {
                    axis: Axis::Horizontal,
                    text,
                    ..
                } => Some(text.as_str()),
                _ => None,
            })
            .take(3)
            .collect();
        assert_eq!(ticks, vec!["0", "20", "40"]);
    }

    #[test]
    fn sequence_numbers_are_consecutive() {
        let bounds = Rect::new(0.0, 0.0, 40.0, 40.0);
        let decorations = grid_decorations(bounds, GridDensity::Large, &GridStyle::default(), 5, 10);
        for (i, d) in decorations.iter().enumerate() {
            assert_eq!(d.key.seq, 10 + i as u32);
            assert_eq!(d.key.cycle, 5);
        }
    }

    #[test]
    fn denser_grid_has_more_lines() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let style = GridStyle::default();
        let small = grid_decorations(bounds, GridDensity::Small, &style, 0, 0).len();
        let large = grid_decorations(bounds, GridDensity::Large, &style, 0, 0).len();
        assert!(small > large);
    }
}
