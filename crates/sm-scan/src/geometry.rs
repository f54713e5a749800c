use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Image-space endpoints of one scanline, as `(column, row)` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scanline {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Scanline {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    /// Image column scanned for this scanline, or `None` when the start point
    /// does not land on a valid column.
    pub fn column(&self) -> Option<usize> {
        let x = self.start.x.round();
        if x.is_finite() && x >= 0.0 {
            Some(x as usize)
        } else {
            None
        }
    }
}

/// Probe geometry collaborator.
///
/// Queried only while a scanline set is being built, never per frame.
pub trait ScanlineGeometry {
    fn number_of_scanlines(&self) -> usize;

    fn scanline_end_points(&self, index: usize) -> Option<Scanline>;
}

impl<G: ScanlineGeometry + ?Sized> ScanlineGeometry for &G {
    fn number_of_scanlines(&self) -> usize {
        (**self).number_of_scanlines()
    }

    fn scanline_end_points(&self, index: usize) -> Option<Scanline> {
        (**self).scanline_end_points(index)
    }
}

/// Linear array whose scanlines are spread evenly across the image width and
/// span its full height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearArrayGeometry {
    pub num_scanlines: usize,
    pub image_width: usize,
    pub image_height: usize,
}

impl LinearArrayGeometry {
    pub fn new(num_scanlines: usize, image_width: usize, image_height: usize) -> Self {
        Self {
            num_scanlines,
            image_width,
            image_height,
        }
    }

    fn column_of(&self, index: usize) -> f64 {
        let last_col = self.image_width.saturating_sub(1) as f64;
        if self.num_scanlines <= 1 {
            return (last_col / 2.0).floor();
        }
        (index as f64 * last_col / (self.num_scanlines - 1) as f64).round()
    }
}

impl ScanlineGeometry for LinearArrayGeometry {
    fn number_of_scanlines(&self) -> usize {
        if self.image_width == 0 || self.image_height == 0 {
            return 0;
        }
        self.num_scanlines
    }

    fn scanline_end_points(&self, index: usize) -> Option<Scanline> {
        if index >= self.number_of_scanlines() {
            return None;
        }
        let x = self.column_of(index);
        let bottom = (self.image_height - 1) as f64;
        Some(Scanline::new(Point2::new(x, 0.0), Point2::new(x, bottom)))
    }
}
