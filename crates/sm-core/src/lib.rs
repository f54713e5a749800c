//! Foundational image primitives for ultrasound frame processing.
//!
//! ## Image Views and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`.
//! This allows borrowed views over padded frame buffers handed over by an
//! acquisition device.
//!
//! ## Coordinates
//! Pixel `(x, y)` addresses column `x` and row `y`. For ultrasound B-mode
//! frames, columns are scanlines and rows grow with depth.
//!
//! ## Border Modes
//! Index mapping supports clamp and reflect-101 behavior for neighborhood
//! reads that would fall outside a 1D signal.

mod border;
mod error;
mod image;

pub use border::{BorderMode, map_index};
pub use error::Error;
pub use image::{Image, ImageView};
