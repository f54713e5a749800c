use serde::{Deserialize, Serialize};
use sm_bone::BoneSurfaceParams;

use crate::error::MarkerError;

/// Bone is not expected closer than this to the transducer face.
pub const MIN_STARTING_DEPTH_MM: f64 = 2.0;

/// Upper bound on the detector's artifact window and gradient length.
pub const MAX_DETECTOR_REACH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Fiducials stay in the output list when the session stops.
    #[default]
    Placement,
    /// Threshold tuning: fiducials are shown while scanning and removed from
    /// the output list when the session stops.
    Configuring,
}

/// Settings fixed for the lifetime of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pixels must be strictly brighter than this to count as bone.
    pub threshold: f32,
    pub starting_depth_mm: f64,
    pub ending_depth_mm: f64,
    /// Minimum distance between accepted points; `<= 0` disables filtering.
    pub min_distance_mm: f64,
    pub scanline_count: usize,
    pub mode: SessionMode,
    pub detector: BoneSurfaceParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold: 200.0,
            starting_depth_mm: MIN_STARTING_DEPTH_MM,
            ending_depth_mm: 10.0,
            min_distance_mm: 2.0,
            scanline_count: 1,
            mode: SessionMode::Placement,
            detector: BoneSurfaceParams::default(),
        }
    }
}

impl SessionConfig {
    /// Checks the settings against a geometry with `available_scanlines`
    /// scanlines.
    pub fn validate(&self, available_scanlines: usize) -> Result<(), MarkerError> {
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(MarkerError::Threshold(self.threshold));
        }
        if !(self.starting_depth_mm.is_finite() && self.starting_depth_mm >= MIN_STARTING_DEPTH_MM)
        {
            return Err(MarkerError::StartingDepth {
                start_mm: self.starting_depth_mm,
                min_mm: MIN_STARTING_DEPTH_MM,
            });
        }
        if !(self.ending_depth_mm.is_finite() && self.ending_depth_mm >= self.starting_depth_mm) {
            return Err(MarkerError::DepthRange {
                start_mm: self.starting_depth_mm,
                end_mm: self.ending_depth_mm,
            });
        }
        if self.min_distance_mm.is_nan() || self.min_distance_mm.is_infinite() {
            return Err(MarkerError::MinimumDistance(self.min_distance_mm));
        }
        self.validate_detector()?;
        if self.scanline_count < 1 || self.scanline_count > available_scanlines {
            return Err(MarkerError::ScanlineCount {
                requested: self.scanline_count,
                available: available_scanlines,
            });
        }
        Ok(())
    }

    fn validate_detector(&self) -> Result<(), MarkerError> {
        let params = &self.detector;
        if !(1..=MAX_DETECTOR_REACH).contains(&params.artifact_window) {
            return Err(MarkerError::DetectorParams {
                param: "artifact_window",
            });
        }
        if !(1..=MAX_DETECTOR_REACH).contains(&params.gradient_length) {
            return Err(MarkerError::DetectorParams {
                param: "gradient_length",
            });
        }
        let ratio = params.artifact_cutoff_ratio;
        if !(ratio.is_finite() && ratio > 0.0 && ratio <= 1.0) {
            return Err(MarkerError::DetectorParams {
                param: "artifact_cutoff_ratio",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sm_bone::BoneSurfaceParams;

    use super::{MAX_DETECTOR_REACH, SessionConfig, SessionMode};
    use crate::error::MarkerError;

    fn with_detector(detector: BoneSurfaceParams) -> SessionConfig {
        SessionConfig {
            detector,
            ..SessionConfig::default()
        }
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.threshold, 200.0);
        assert_eq!(cfg.ending_depth_mm, 10.0);
        assert_eq!(cfg.validate(1), Ok(()));
    }

    #[test]
    fn scanline_count_must_fit_geometry() {
        let cfg = SessionConfig {
            scanline_count: 9,
            ..SessionConfig::default()
        };
        assert_eq!(cfg.validate(9), Ok(()));
        assert_eq!(
            cfg.validate(8),
            Err(MarkerError::ScanlineCount {
                requested: 9,
                available: 8
            })
        );

        let none = SessionConfig {
            scanline_count: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            none.validate(8),
            Err(MarkerError::ScanlineCount { requested: 0, .. })
        ));
    }

    #[test]
    fn depth_range_is_checked() {
        let shallow = SessionConfig {
            starting_depth_mm: 1.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            shallow.validate(1),
            Err(MarkerError::StartingDepth { .. })
        ));

        let inverted = SessionConfig {
            starting_depth_mm: 12.0,
            ending_depth_mm: 10.0,
            ..SessionConfig::default()
        };
        assert_eq!(
            inverted.validate(1),
            Err(MarkerError::DepthRange {
                start_mm: 12.0,
                end_mm: 10.0
            })
        );

        let equal = SessionConfig {
            starting_depth_mm: 10.0,
            ..SessionConfig::default()
        };
        assert_eq!(equal.validate(1), Ok(()));
    }

    #[test]
    fn threshold_and_distance_domains() {
        let negative = SessionConfig {
            threshold: -1.0,
            ..SessionConfig::default()
        };
        assert_eq!(negative.validate(1), Err(MarkerError::Threshold(-1.0)));

        let disabled = SessionConfig {
            min_distance_mm: 0.0,
            ..SessionConfig::default()
        };
        assert_eq!(disabled.validate(1), Ok(()));

        let nan = SessionConfig {
            min_distance_mm: f64::NAN,
            ..SessionConfig::default()
        };
        assert!(matches!(nan.validate(1), Err(MarkerError::MinimumDistance(_))));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: SessionConfig = serde_json::from_str(
            r#"{ "threshold": 180, "scanline_count": 5, "mode": "configuring",
                 "detector": { "artifact_cutoff_ratio": 0.5 } }"#,
        )
        .expect("valid config");

        assert_eq!(cfg.threshold, 180.0);
        assert_eq!(cfg.scanline_count, 5);
        assert_eq!(cfg.mode, SessionMode::Configuring);
        assert_eq!(cfg.starting_depth_mm, 2.0);
        assert_eq!(cfg.detector.artifact_cutoff_ratio, 0.5);
        assert_eq!(cfg.detector.gradient_length, 5);
    }

    #[test]
    fn zero_length_neighborhoods_are_rejected() {
        let no_gradient = with_detector(BoneSurfaceParams {
            gradient_length: 0,
            ..BoneSurfaceParams::default()
        });
        assert_eq!(
            no_gradient.validate(1),
            Err(MarkerError::DetectorParams {
                param: "gradient_length"
            })
        );

        let no_window = with_detector(BoneSurfaceParams {
            artifact_window: 0,
            ..BoneSurfaceParams::default()
        });
        assert_eq!(
            no_window.validate(1),
            Err(MarkerError::DetectorParams {
                param: "artifact_window"
            })
        );
    }

    #[test]
    fn oversized_neighborhoods_are_rejected() {
        let at_cap = with_detector(BoneSurfaceParams {
            artifact_window: MAX_DETECTOR_REACH,
            gradient_length: MAX_DETECTOR_REACH,
            ..BoneSurfaceParams::default()
        });
        assert_eq!(at_cap.validate(1), Ok(()));

        let long_gradient = with_detector(BoneSurfaceParams {
            gradient_length: MAX_DETECTOR_REACH + 1,
            ..BoneSurfaceParams::default()
        });
        assert!(matches!(
            long_gradient.validate(1),
            Err(MarkerError::DetectorParams {
                param: "gradient_length"
            })
        ));

        let wide_window = with_detector(BoneSurfaceParams {
            artifact_window: usize::MAX,
            ..BoneSurfaceParams::default()
        });
        assert!(matches!(
            wide_window.validate(1),
            Err(MarkerError::DetectorParams {
                param: "artifact_window"
            })
        ));
    }

    #[test]
    fn cutoff_ratio_must_be_a_fraction() {
        for ratio in [-1.0, 0.0, 1.5, f32::NAN, f32::INFINITY] {
            let cfg = with_detector(BoneSurfaceParams {
                artifact_cutoff_ratio: ratio,
                ..BoneSurfaceParams::default()
            });
            assert_eq!(
                cfg.validate(1),
                Err(MarkerError::DetectorParams {
                    param: "artifact_cutoff_ratio"
                }),
                "ratio={ratio}"
            );
        }

        let full = with_detector(BoneSurfaceParams {
            artifact_cutoff_ratio: 1.0,
            ..BoneSurfaceParams::default()
        });
        assert_eq!(full.validate(1), Ok(()));
    }

    #[test]
    fn disabled_ridge_check_from_json_fails_validation() {
        let cfg: SessionConfig =
            serde_json::from_str(r#"{ "scanline_count": 3, "detector": { "gradient_length": 0 } }"#)
                .expect("valid json");
        assert_eq!(
            cfg.validate(3),
            Err(MarkerError::DetectorParams {
                param: "gradient_length"
            })
        );
    }
}
