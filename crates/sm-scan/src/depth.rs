use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Band of rows, `[start_px, end_px)`, searched for a bone surface.
///
/// A window with `start_px >= end_px` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepthWindow {
    pub start_px: usize,
    pub end_px: usize,
}

impl DepthWindow {
    pub fn new(start_px: usize, end_px: usize) -> Self {
        Self { start_px, end_px }
    }

    /// Converts a millimeter depth range into rows using the vertical pixel
    /// spacing. Depths are truncated toward zero.
    ///
    /// Returns `None` for a non-positive or non-finite spacing.
    pub fn from_mm(start_mm: f64, end_mm: f64, spacing_mm: f64) -> Option<Self> {
        if !(spacing_mm.is_finite() && spacing_mm > 0.0) {
            return None;
        }
        Some(Self {
            start_px: mm_to_px(start_mm, spacing_mm),
            end_px: mm_to_px(end_mm, spacing_mm),
        })
    }

    pub fn len(&self) -> usize {
        self.end_px.saturating_sub(self.start_px)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rows(&self) -> Range<usize> {
        self.start_px..self.start_px + self.len()
    }
}

fn mm_to_px(mm: f64, spacing_mm: f64) -> usize {
    let px = mm / spacing_mm;
    if px.is_finite() && px > 0.0 {
        px as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::DepthWindow;

    #[test]
    fn converts_millimeters_with_truncation() {
        let w = DepthWindow::from_mm(2.0, 10.0, 0.3).expect("valid spacing");
        assert_eq!(w, DepthWindow::new(6, 33));
        assert_eq!(w.len(), 27);
        assert_eq!(w.rows(), 6..33);
    }

    #[test]
    fn inverted_window_is_empty() {
        let w = DepthWindow::new(20, 10);
        assert!(w.is_empty());
        assert_eq!(w.rows(), 20..20);
        assert_eq!(w.rows().count(), 0);
    }

    #[test]
    fn invalid_spacing_is_rejected() {
        assert!(DepthWindow::from_mm(2.0, 10.0, 0.0).is_none());
        assert!(DepthWindow::from_mm(2.0, 10.0, -0.1).is_none());
        assert!(DepthWindow::from_mm(2.0, 10.0, f64::NAN).is_none());
    }

    #[test]
    fn negative_depth_clamps_to_top_row() {
        let w = DepthWindow::from_mm(-5.0, 1.0, 0.5).expect("valid spacing");
        assert_eq!(w, DepthWindow::new(0, 2));
    }
}
