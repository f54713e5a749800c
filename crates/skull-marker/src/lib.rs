//! Umbrella crate for the `skull-marker` workspace.
//!
//! Re-exports the image primitives, scanline selection, bone surface
//! detection and the fiducial placement session.

pub use sm_bone::*;
pub use sm_core::*;
pub use sm_marker::*;
pub use sm_scan::*;
