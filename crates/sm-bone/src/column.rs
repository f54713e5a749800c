use core::fmt;
use std::ops::Range;

use sm_scan::DepthWindow;

/// One image column of intensity samples, indexed by row.
#[derive(Debug, Clone, Copy)]
pub struct PixelColumn<'a, T> {
    pub x: usize,
    pub samples: &'a [T],
}

impl<'a, T> PixelColumn<'a, T> {
    pub fn new(x: usize, samples: &'a [T]) -> Self {
        Self { x, samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCandidate {
    pub column: usize,
    pub row: usize,
    pub intensity: f32,
}

/// Reason a scanline cannot be searched in the current frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegenerateScanline {
    ColumnOutOfRange { x: Option<usize>, width: usize },
    WindowOutOfRange { start_px: usize, len: usize },
    ColumnTooShort { end_px: usize, len: usize },
}

impl fmt::Display for DegenerateScanline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnOutOfRange { x: Some(x), width } => {
                write!(f, "scanline column {x} outside image width {width}")
            }
            Self::ColumnOutOfRange { x: None, width } => {
                write!(f, "scanline has no valid column (image width {width})")
            }
            Self::WindowOutOfRange { start_px, len } => {
                write!(f, "depth window starts at row {start_px}, column has {len} rows")
            }
            Self::ColumnTooShort { end_px, len } => {
                write!(f, "depth window ends at row {end_px}, column has {len} rows")
            }
        }
    }
}

impl std::error::Error for DegenerateScanline {}

/// Resolves the rows of `window` inside a column of `len` samples.
///
/// An empty window is valid and yields an empty range.
pub fn check_window(len: usize, window: DepthWindow) -> Result<Range<usize>, DegenerateScanline> {
    if window.is_empty() {
        return Ok(window.rows());
    }
    if window.start_px >= len {
        return Err(DegenerateScanline::WindowOutOfRange {
            start_px: window.start_px,
            len,
        });
    }
    if window.end_px > len {
        return Err(DegenerateScanline::ColumnTooShort {
            end_px: window.end_px,
            len,
        });
    }
    Ok(window.rows())
}

#[cfg(test)]
mod tests {
    use sm_scan::DepthWindow;

    use super::{DegenerateScanline, check_window};

    #[test]
    fn window_inside_column() {
        assert_eq!(check_window(40, DepthWindow::new(5, 40)), Ok(5..40));
        assert_eq!(check_window(40, DepthWindow::new(0, 1)), Ok(0..1));
    }

    #[test]
    fn empty_window_is_not_degenerate() {
        assert_eq!(check_window(40, DepthWindow::new(30, 10)).map(|r| r.len()), Ok(0));
        assert_eq!(check_window(0, DepthWindow::new(7, 7)).map(|r| r.len()), Ok(0));
    }

    #[test]
    fn window_past_column_end() {
        assert_eq!(
            check_window(30, DepthWindow::new(35, 40)),
            Err(DegenerateScanline::WindowOutOfRange {
                start_px: 35,
                len: 30
            })
        );
        assert_eq!(
            check_window(30, DepthWindow::new(10, 31)),
            Err(DegenerateScanline::ColumnTooShort { end_px: 31, len: 30 })
        );
    }
}
