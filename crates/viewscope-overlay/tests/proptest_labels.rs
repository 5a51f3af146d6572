//! Placement invariants for dimension labels and grid lines.

use proptest::prelude::*;
use viewscope_core::{GridDensity, Rect, Size};
use viewscope_overlay::grid::{grid_decorations, line_offsets};
use viewscope_overlay::label::{dimension_text, measure, place};
use viewscope_overlay::{GridStyle, LabelStyle};

const SURFACE: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);

fn target() -> impl Strategy<Value = Rect> {
    (-100.0f64..500.0, -100.0f64..950.0, 0.0f64..400.0, 0.0f64..400.0)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

proptest! {
    #[test]
    fn label_stays_inside_surface(target in target()) {
        let style = LabelStyle::default();
        let text = dimension_text(target.size());
        let frame = place(&text, target, SURFACE, &style);

        prop_assert!(frame.x >= SURFACE.x);
        prop_assert!(frame.y >= SURFACE.y);
        prop_assert!(frame.max_x() <= SURFACE.max_x() + 1e-9);
        prop_assert!(frame.max_y() <= SURFACE.max_y() + 1e-9);
        prop_assert_eq!(frame.size(), measure(&text, &style));
    }

    #[test]
    fn label_inside_surface_keeps_center(x in 60.0f64..300.0, y in 60.0f64..700.0) {
        let style = LabelStyle::default();
        let target = Rect::new(x, y, 30.0, 30.0);
        let frame = place("30 × 30", target, SURFACE, &style);
        let (a, b) = (frame.center(), target.center());
        prop_assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
    }

    #[test]
    fn label_text_truncates(w in 0.0f64..5000.0, h in 0.0f64..5000.0) {
        let text = dimension_text(Size::new(w, h));
        prop_assert_eq!(text, format!("{} × {}", w.trunc() as u64, h.trunc() as u64));
    }

    #[test]
    fn grid_lines_stay_on_surface(w in 1.0f64..2000.0, h in 1.0f64..2000.0) {
        let bounds = Rect::new(0.0, 0.0, w, h);
        for density in [GridDensity::Small, GridDensity::Medium, GridDensity::Large] {
            for offset in line_offsets(w, density.spacing()) {
                prop_assert!((0.0..=w).contains(&offset));
            }
            for d in grid_decorations(bounds, density, &GridStyle::default(), 1, 0) {
                prop_assert!(d.frame.x <= w && d.frame.y <= h);
            }
        }
    }
}
