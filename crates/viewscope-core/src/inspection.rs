#![forbid(unsafe_code)]

//! Tap-to-inspect state.
//!
//! A tap on the overlay resolves one host node and publishes an
//! [`InspectionRecord`]. Publishing replaces any previous record and shows
//! the inspector panel; dismissing the panel clears the record.

use web_time::{Instant, SystemTime};

use crate::geometry::{Point, Rect, Size, truncate};

/// Geometry captured for one inspected node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InspectionRecord {
    /// Node size in its own coordinate space.
    pub size: Size,
    /// Origin of the node in root coordinate space.
    pub position: Point,
    /// Full frame in root coordinate space.
    pub frame: Rect,
    /// Monotonic capture time.
    pub captured_at: Instant,
    /// Wall-clock capture time, for display.
    pub captured_wall: SystemTime,
}

impl InspectionRecord {
    /// Capture a record now.
    pub fn capture(size: Size, frame: Rect) -> Self {
        Self {
            size,
            position: frame.origin(),
            frame,
            captured_at: Instant::now(),
            captured_wall: SystemTime::now(),
        }
    }

    /// Three-line summary with integer-truncated values.
    pub fn describe(&self) -> String {
        let (w, h) = self.size.truncated();
        format!(
            "Size: {w} × {h}\nPosition: ({}, {})\nFrame: {}, {}, {}, {}",
            truncate(self.position.x),
            truncate(self.position.y),
            truncate(self.frame.x),
            truncate(self.frame.y),
            truncate(self.frame.width),
            truncate(self.frame.height),
        )
    }
}

/// Current inspection and inspector-panel visibility.
#[derive(Debug, Clone, Default)]
pub struct InspectionState {
    record: Option<InspectionRecord>,
    panel_visible: bool,
    published: u64,
}

impl InspectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current record and show the inspector panel.
    pub fn publish(&mut self, record: InspectionRecord) {
        tracing::debug!(
            x = record.frame.x,
            y = record.frame.y,
            width = record.frame.width,
            height = record.frame.height,
            "inspection published"
        );
        self.record = Some(record);
        self.panel_visible = true;
        self.published += 1;
    }

    /// Hide the inspector panel and clear the record.
    pub fn dismiss(&mut self) {
        self.record = None;
        self.panel_visible = false;
    }

    #[inline]
    pub fn record(&self) -> Option<&InspectionRecord> {
        self.record.as_ref()
    }

    #[inline]
    pub fn is_panel_visible(&self) -> bool {
        self.panel_visible
    }

    /// Total records published since construction.
    #[inline]
    pub fn published_count(&self) -> u64 {
        self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(x: f64, y: f64, w: f64, h: f64) -> InspectionRecord {
        InspectionRecord::capture(Size::new(w, h), Rect::new(x, y, w, h))
    }

    #[test]
    fn publish_replaces_and_shows_panel() {
        let mut state = InspectionState::new();
        assert!(state.record().is_none());
        assert!(!state.is_panel_visible());

        state.publish(record(0.0, 0.0, 10.0, 10.0));
        state.publish(record(5.0, 6.0, 20.0, 30.0));

        assert!(state.is_panel_visible());
        assert_eq!(state.record().map(|r| r.frame), Some(Rect::new(5.0, 6.0, 20.0, 30.0)));
        assert_eq!(state.published_count(), 2);
    }

    #[test]
    fn dismiss_clears() {
        let mut state = InspectionState::new();
        state.publish(record(0.0, 0.0, 10.0, 10.0));
        state.dismiss();
        assert!(state.record().is_none());
        assert!(!state.is_panel_visible());
    }

    #[test]
    fn describe_truncates() {
        let r = record(200.6, 300.2, 120.9, 40.1);
        assert_eq!(
            r.describe(),
            "Size: 120 × 40\nPosition: (200, 300)\nFrame: 200, 300, 120, 40"
        );
    }

    #[test]
    fn position_is_frame_origin() {
        let r = record(7.0, 8.0, 1.0, 1.0);
        assert_eq!(r.position, Point::new(7.0, 8.0));
    }
}
