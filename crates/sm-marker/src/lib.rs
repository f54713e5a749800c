//! Skull surface fiducial placement on tracked ultrasound frames.
//!
//! A [`MarkerSession`] owns everything that lives for one placement run:
//! the selected scanlines, the detector configuration, the points accepted
//! so far and the sink that receives them. The host hands over frames one
//! at a time through [`MarkerSession::process_frame`]; each frame is
//! processed to completion before the call returns.
//!
//! Per frame and per scanline:
//! 1. gather the scanline's image column,
//! 2. find a bone surface pixel inside the depth window,
//! 3. map it to world coordinates with the frame's image-to-world transform,
//! 4. drop it if an accepted point lies within the minimum distance,
//! 5. otherwise append it to the accumulated set and to the sink.

mod config;
mod error;
mod mapper;
mod proximity;
mod session;
mod sink;

pub use config::{MAX_DETECTOR_REACH, MIN_STARTING_DEPTH_MM, SessionConfig, SessionMode};
pub use error::MarkerError;
pub use mapper::{WorldPoint, compose_image_to_world, to_world};
pub use proximity::{AccumulatedPointSet, ProximityFilter, ProximityRule};
pub use session::{MarkerSession, MarkerSessionBuilder, SessionStats, UltrasoundFrame};
pub use sink::{Fiducial, FiducialList, PointSink};
