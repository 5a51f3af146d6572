#![forbid(unsafe_code)]

//! Dimension labels.
//!
//! A label shows a node's integer width and height, is sized to its own
//! text, centered on the node's frame and then clamped inside the surface.

use unicode_width::UnicodeWidthStr;
use viewscope_core::{Rect, Size};

use crate::config::LabelStyle;

/// Caption for a node of `size`: `"W × H"`, both truncated toward zero.
pub fn dimension_text(size: Size) -> String {
    let (w, h) = size.truncated();
    format!("{w} × {h}")
}

/// Size of a single-line caption including padding.
pub fn measure(text: &str, style: &LabelStyle) -> Size {
    let columns = text.width() as f64;
    Size::new(columns * style.glyph_advance, style.line_height).outset(style.padding)
}

/// Frame of a caption centered on `target` and kept within `bounds`.
pub fn place(text: &str, target: Rect, bounds: Rect, style: &LabelStyle) -> Rect {
    target
        .centered(measure(text, style))
        .clamp_within(&bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_truncates_toward_zero() {
        assert_eq!(dimension_text(Size::new(120.0, 40.0)), "120 × 40");
        assert_eq!(dimension_text(Size::new(99.9, 0.4)), "99 × 0");
    }

    #[test]
    fn measure_counts_columns() {
        let style = LabelStyle::default();
        // 8 columns * 7 + 8 horizontal padding, 14 + 4 vertical padding.
        assert_eq!(measure("120 × 40", &style), Size::new(64.0, 18.0));
    }

    #[test]
    fn centered_on_target() {
        let style = LabelStyle::default();
        let bounds = Rect::new(0.0, 0.0, 390.0, 844.0);
        let frame = place("120 × 40", Rect::new(200.0, 300.0, 120.0, 40.0), bounds, &style);
        assert_eq!(frame.center().x, 260.0);
        assert_eq!(frame.center().y, 320.0);
    }

    #[test]
    fn clamped_at_edges() {
        let style = LabelStyle::default();
        let bounds = Rect::new(0.0, 0.0, 390.0, 844.0);

        let frame = place("20 × 20", Rect::new(-10.0, -10.0, 20.0, 20.0), bounds, &style);
        assert_eq!((frame.x, frame.y), (0.0, 0.0));

        let frame = place("20 × 20", Rect::new(380.0, 834.0, 20.0, 20.0), bounds, &style);
        assert_eq!(frame.max_x(), 390.0);
        assert_eq!(frame.max_y(), 844.0);
    }
}
