use core::fmt;

use log::debug;

use crate::geometry::{Scanline, ScanlineGeometry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    OutOfRange { requested: usize, available: usize },
    MissingScanline { index: usize },
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange {
                requested,
                available,
            } => write!(
                f,
                "scanline count {requested} out of range: expected 1..={available}"
            ),
            Self::MissingScanline { index } => {
                write!(f, "geometry has no endpoints for scanline {index}")
            }
        }
    }
}

impl std::error::Error for SelectError {}

/// Picks `desired` scanline indices out of `total`, centered on the middle
/// scanline.
///
/// Order: middle first, then alternating right/left pairs moving outwards.
/// With an even `desired` the remaining scanline is added on the right after
/// the pairs, so the right side holds one more than the left.
pub fn select_scanline_indices(total: usize, desired: usize) -> Result<Vec<usize>, SelectError> {
    if desired < 1 || desired > total {
        return Err(SelectError::OutOfRange {
            requested: desired,
            available: total,
        });
    }

    let mid = (total - 1) / 2;
    let mut indices = Vec::with_capacity(desired);
    indices.push(mid);

    let half = desired / 2;
    if half == 0 {
        return Ok(indices);
    }

    let interval = (mid / half).max(1);
    let even = desired % 2 == 0;
    let pairs = if even { half - 1 } else { half };

    for i in 1..=pairs {
        indices.push(mid + i * interval);
        indices.push(mid - i * interval);
    }
    if even {
        indices.push(mid + half * interval);
    }

    debug_assert_eq!(indices.len(), desired);
    debug_assert!(indices.iter().all(|&i| i < total));
    Ok(indices)
}

/// Scanlines used for detection during one session.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanlineSet {
    indices: Vec<usize>,
    scanlines: Vec<Scanline>,
}

impl ScanlineSet {
    /// Selects `desired` scanlines from `geometry` and resolves their
    /// endpoints.
    pub fn select<G: ScanlineGeometry + ?Sized>(
        geometry: &G,
        desired: usize,
    ) -> Result<Self, SelectError> {
        let indices = select_scanline_indices(geometry.number_of_scanlines(), desired)?;
        let scanlines = indices
            .iter()
            .map(|&index| {
                geometry
                    .scanline_end_points(index)
                    .ok_or(SelectError::MissingScanline { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "selected {} of {} scanlines: {:?}",
            indices.len(),
            geometry.number_of_scanlines(),
            indices
        );

        Ok(Self { indices, scanlines })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn scanlines(&self) -> &[Scanline] {
        &self.scanlines
    }

    pub fn len(&self) -> usize {
        self.scanlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scanlines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scanline> {
        self.scanlines.iter()
    }
}
