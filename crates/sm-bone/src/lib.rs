//! Bone surface detection on single ultrasound scanlines.
//!
//! Core strategy:
//! - Walk the depth window of one pixel column toward greater depth.
//! - Keep pixels brighter than the threshold.
//! - Reject isolated bright specks whose neighborhoods above and below are
//!   both dim (speckle, reverberation artifacts).
//! - Require a ridge: brighter than the tissue a few samples above and a few
//!   samples below.
//!
//! Samples are generic over `u8`, `u16` and `f32` intensities. Reads past
//! either end of the column follow [`BorderMode`](sm_core::BorderMode).

mod column;
mod detector;

pub use column::{DegenerateScanline, PixelColumn, SurfaceCandidate, check_window};
pub use detector::{
    ARTIFACT_CUTOFF_RATIO, ARTIFACT_WINDOW, BoneSurfaceDetector, BoneSurfaceParams,
    GRADIENT_LENGTH,
};
