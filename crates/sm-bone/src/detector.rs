use serde::{Deserialize, Serialize};
use sm_core::{BorderMode, map_index};
use sm_scan::DepthWindow;

use crate::column::{DegenerateScanline, PixelColumn, SurfaceCandidate, check_window};

/// Samples averaged on each side of a candidate by the artifact check.
pub const ARTIFACT_WINDOW: usize = 3;
/// Samples walked on each side of a candidate by the ridge check.
pub const GRADIENT_LENGTH: usize = 5;
/// A side is dim when its mean is below this fraction of the candidate.
pub const ARTIFACT_CUTOFF_RATIO: f32 = 0.40;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneSurfaceParams {
    pub artifact_window: usize,
    pub gradient_length: usize,
    pub artifact_cutoff_ratio: f32,
    pub border: BorderMode,
}

impl Default for BoneSurfaceParams {
    fn default() -> Self {
        Self {
            artifact_window: ARTIFACT_WINDOW,
            gradient_length: GRADIENT_LENGTH,
            artifact_cutoff_ratio: ARTIFACT_CUTOFF_RATIO,
            border: BorderMode::Clamp,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoneSurfaceDetector {
    params: BoneSurfaceParams,
}

impl BoneSurfaceDetector {
    pub fn new(params: BoneSurfaceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &BoneSurfaceParams {
        &self.params
    }

    /// Returns the bone surface pixel of `column` inside `window`, if any.
    ///
    /// Degenerate windows yield `None`; use [`Self::detect_checked`] to tell
    /// them apart from a clean miss.
    pub fn detect<T: Copy + Into<f32>>(
        &self,
        column: &PixelColumn<'_, T>,
        window: DepthWindow,
        threshold: f32,
    ) -> Option<SurfaceCandidate> {
        self.detect_checked(column, window, threshold)
            .ok()
            .flatten()
    }

    pub fn detect_checked<T: Copy + Into<f32>>(
        &self,
        column: &PixelColumn<'_, T>,
        window: DepthWindow,
        threshold: f32,
    ) -> Result<Option<SurfaceCandidate>, DegenerateScanline> {
        let rows = check_window(column.len(), window)?;
        let samples = column.samples;

        let mut found = None;
        for row in rows {
            let value: f32 = samples[row].into();
            if value <= threshold {
                continue;
            }
            if self.is_artifact(samples, row, value) || !self.is_ridge(samples, row, value) {
                continue;
            }

            // No early exit: a deeper qualifying pixel replaces a shallower
            // one, so the deepest ridge in the window is reported. Whether
            // bone should instead be the first ridge is unresolved.
            found = Some(SurfaceCandidate {
                column: column.x,
                row,
                intensity: value,
            });
        }

        Ok(found)
    }

    /// True when the means directly above and directly below `row` are both
    /// under the cutoff.
    fn is_artifact<T: Copy + Into<f32>>(&self, samples: &[T], row: usize, value: f32) -> bool {
        let n = self.params.artifact_window;
        if n == 0 {
            return false;
        }

        let mut above = 0.0f32;
        let mut below = 0.0f32;
        for k in 1..=n {
            above += self.sample(samples, row as isize - k as isize);
            below += self.sample(samples, row as isize + k as isize);
        }
        above /= n as f32;
        below /= n as f32;

        let cutoff = value * self.params.artifact_cutoff_ratio;
        above < cutoff && below < cutoff
    }

    fn is_ridge<T: Copy + Into<f32>>(&self, samples: &[T], row: usize, value: f32) -> bool {
        let mut above_sum = 0.0f32;
        let mut below_sum = 0.0f32;
        let mut prev_above = value;
        let mut prev_below = value;

        for k in 1..=self.params.gradient_length {
            let above = self.sample(samples, row as isize - k as isize);
            let below = self.sample(samples, row as isize + k as isize);
            above_sum += prev_above - above;
            below_sum += below - prev_below;
            prev_above = above;
            prev_below = below;
        }

        above_sum > 0.0 && below_sum < 0.0
    }

    #[inline]
    fn sample<T: Copy + Into<f32>>(&self, samples: &[T], i: isize) -> f32 {
        map_index(i, samples.len(), self.params.border)
            .and_then(|idx| samples.get(idx))
            .map_or(0.0, |&v| v.into())
    }
}
