use skull_marker::Image;

pub const PEAK: u8 = 240;
pub const SHOULDER: u8 = 130;

/// Low-amplitude deterministic speckle, always below 40.
pub fn speckle(x: usize, y: usize) -> u8 {
    ((x * 31 + y * 17) % 40) as u8
}

/// B-mode frame with a bone echo at `bone_row(x)` in each column that has
/// one: a bright peak with three moderately bright rows on either side.
pub fn bone_frame_u8(
    width: usize,
    height: usize,
    bone_row: impl Fn(usize) -> Option<usize>,
) -> Image<u8> {
    Image::from_fn(width, height, |x, y| match bone_row(x) {
        Some(b) if y == b => PEAK,
        Some(b) if y.abs_diff(b) <= 3 => SHOULDER,
        _ => speckle(x, y),
    })
}

/// Speckle with single-pixel bright spikes every `period` rows.
pub fn spiky_frame_u8(width: usize, height: usize, period: usize) -> Image<u8> {
    assert!(period > 0, "period must be positive");
    Image::from_fn(width, height, |x, y| {
        if y % period == 0 { 255 } else { speckle(x, y) }
    })
}
