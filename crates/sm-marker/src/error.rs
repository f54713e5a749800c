use core::fmt;

use sm_scan::SelectError;

/// Setup failures. All of them are reported before the first frame is
/// processed; per-frame anomalies never surface as errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerError {
    ScanlineCount { requested: usize, available: usize },
    DepthRange { start_mm: f64, end_mm: f64 },
    StartingDepth { start_mm: f64, min_mm: f64 },
    Threshold(f32),
    MinimumDistance(f64),
    /// A bone surface detector parameter is outside its usable range.
    DetectorParams { param: &'static str },
    MissingGeometry,
    MissingScanline { index: usize },
    MissingSink,
}

impl fmt::Display for MarkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScanlineCount {
                requested,
                available,
            } => write!(
                f,
                "number of scanlines {requested} out of range: expected 1..={available}"
            ),
            Self::DepthRange { start_mm, end_mm } => {
                write!(f, "invalid depth range {start_mm}..{end_mm} mm")
            }
            Self::StartingDepth { start_mm, min_mm } => {
                write!(f, "starting depth {start_mm} mm is below {min_mm} mm")
            }
            Self::Threshold(t) => write!(f, "invalid bone surface threshold {t}"),
            Self::MinimumDistance(d) => write!(f, "invalid minimum point distance {d} mm"),
            Self::DetectorParams { param } => {
                write!(f, "bone surface detector parameter `{param}` out of range")
            }
            Self::MissingGeometry => write!(f, "ultrasound geometry not available"),
            Self::MissingScanline { index } => {
                write!(f, "geometry has no endpoints for scanline {index}")
            }
            Self::MissingSink => write!(f, "output fiducial list not set"),
        }
    }
}

impl std::error::Error for MarkerError {}

impl From<SelectError> for MarkerError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::OutOfRange {
                requested,
                available,
            } => Self::ScanlineCount {
                requested,
                available,
            },
            SelectError::MissingScanline { index } => Self::MissingScanline { index },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MarkerError;

    #[test]
    fn depth_range_message_covers_non_finite_end() {
        let err = MarkerError::DepthRange {
            start_mm: 2.0,
            end_mm: f64::INFINITY,
        };
        assert_eq!(err.to_string(), "invalid depth range 2..inf mm");

        let inverted = MarkerError::DepthRange {
            start_mm: 12.0,
            end_mm: 10.0,
        };
        assert_eq!(inverted.to_string(), "invalid depth range 12..10 mm");
    }

    #[test]
    fn detector_params_message_names_the_parameter() {
        let err = MarkerError::DetectorParams {
            param: "gradient_length",
        };
        assert!(err.to_string().contains("`gradient_length`"));
    }
}
