use nalgebra::{Matrix4, Point3, Vector4};
use sm_bone::SurfaceCandidate;

/// Point in the world (patient) frame, in millimeters.
pub type WorldPoint = Point3<f64>;

/// Maps a detected pixel to world space.
///
/// The pixel is lifted to `(column, row, 0, 1)`: it lies in the image plane
/// with no elevational offset. The transform is applied as a plain 4x4
/// product without perspective divide.
pub fn to_world(candidate: &SurfaceCandidate, image_to_world: &Matrix4<f64>) -> WorldPoint {
    let h = image_to_world * Vector4::new(candidate.column as f64, candidate.row as f64, 0.0, 1.0);
    Point3::new(h.x, h.y, h.z)
}

/// Composes the volume's own image-to-parent matrix with the transform of
/// its parent node, when it has one.
pub fn compose_image_to_world(
    image_to_parent: &Matrix4<f64>,
    parent_to_world: Option<&Matrix4<f64>>,
) -> Matrix4<f64> {
    match parent_to_world {
        Some(parent) => parent * image_to_parent,
        None => *image_to_parent,
    }
}
