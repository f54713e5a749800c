//! Scanline bookkeeping for linear-array ultrasound frames.
//!
//! A probe geometry exposes a fixed number of scanlines, each described by
//! its image-space endpoints. Detection does not run on every scanline:
//! [`ScanlineSet::select`] picks a symmetric subset centered on the middle
//! scanline once per session, and [`DepthWindow`] restricts each scanline to
//! the depth band where bone is expected.
//!
//! Only linear geometry is supported: a scanline is one vertical image
//! column, so its start column is the column that gets scanned.

mod depth;
mod geometry;
mod select;

pub use depth::DepthWindow;
pub use geometry::{LinearArrayGeometry, Scanline, ScanlineGeometry};
pub use select::{ScanlineSet, SelectError, select_scanline_indices};
