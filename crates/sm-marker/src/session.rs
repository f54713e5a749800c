use log::{debug, info, warn};
use nalgebra::Matrix4;
use serde::Serialize;
use sm_bone::{BoneSurfaceDetector, DegenerateScanline, PixelColumn, SurfaceCandidate};
use sm_core::ImageView;
use sm_scan::{DepthWindow, Scanline, ScanlineGeometry, ScanlineSet};

use crate::config::{SessionConfig, SessionMode};
use crate::error::MarkerError;
use crate::mapper::{WorldPoint, to_world};
use crate::proximity::{AccumulatedPointSet, ProximityFilter};
use crate::sink::PointSink;

/// One B-mode frame as delivered by the image source.
#[derive(Debug, Clone, Copy)]
pub struct UltrasoundFrame<'a, T> {
    pub image: ImageView<'a, T>,
    /// Pixel spacing `[column, row]` in millimeters.
    pub spacing_mm: [f64; 2],
    /// Pixel `(column, row, 0, 1)` to world, parent transforms included.
    pub image_to_world: Matrix4<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames: usize,
    pub skipped_frames: usize,
    pub candidates: usize,
    pub accepted: usize,
    pub too_close: usize,
    pub degenerate_scanlines: usize,
}

pub struct MarkerSessionBuilder<'g, S> {
    config: SessionConfig,
    geometry: Option<&'g dyn ScanlineGeometry>,
    sink: Option<S>,
}

impl<'g, S: PointSink> MarkerSessionBuilder<'g, S> {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            geometry: None,
            sink: None,
        }
    }

    pub fn geometry(mut self, geometry: &'g dyn ScanlineGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validates the configuration and selects the session's scanlines.
    pub fn build(self) -> Result<MarkerSession<S>, MarkerError> {
        let geometry = self.geometry.ok_or(MarkerError::MissingGeometry)?;
        let sink = self.sink.ok_or(MarkerError::MissingSink)?;

        let available = geometry.number_of_scanlines();
        if available == 0 {
            return Err(MarkerError::MissingGeometry);
        }
        self.config.validate(available)?;

        let scanlines = ScanlineSet::select(geometry, self.config.scanline_count)?;
        info!(
            "marker session started ({:?}): {} of {} scanlines, threshold {}, depth {}..{} mm, min distance {} mm",
            self.config.mode,
            scanlines.len(),
            available,
            self.config.threshold,
            self.config.starting_depth_mm,
            self.config.ending_depth_mm,
            self.config.min_distance_mm,
        );

        Ok(MarkerSession {
            detector: BoneSurfaceDetector::new(self.config.detector),
            proximity: ProximityFilter::new(self.config.min_distance_mm),
            config: self.config,
            scanlines,
            points: AccumulatedPointSet::new(),
            sink,
            window: None,
            col_buf: Vec::new(),
            stats: SessionStats::default(),
            active: true,
        })
    }
}

/// Frame processor for one fiducial placement run.
///
/// Frames are processed through `&mut self`, so one session never works on
/// two frames at once.
#[derive(Debug)]
pub struct MarkerSession<S> {
    config: SessionConfig,
    detector: BoneSurfaceDetector,
    proximity: ProximityFilter,
    scanlines: ScanlineSet,
    points: AccumulatedPointSet,
    sink: S,
    /// Depth window with the row spacing it was computed for.
    window: Option<(f64, DepthWindow)>,
    col_buf: Vec<f32>,
    stats: SessionStats,
    active: bool,
}

impl<S: PointSink> MarkerSession<S> {
    pub fn builder<'g>(config: SessionConfig) -> MarkerSessionBuilder<'g, S> {
        MarkerSessionBuilder::new(config)
    }

    /// Runs detection on every selected scanline of `frame` and returns the
    /// points accepted from it.
    ///
    /// Frames arriving while the session is stopped are ignored. A frame with
    /// unusable spacing or transform is skipped whole; a scanline that cannot
    /// be searched is skipped alone.
    pub fn process_frame<T: Copy + Into<f32>>(
        &mut self,
        frame: &UltrasoundFrame<'_, T>,
    ) -> Vec<WorldPoint> {
        if !self.active {
            debug!("frame ignored: session is stopped");
            return Vec::new();
        }
        self.stats.frames += 1;

        let Some(window) = self.depth_window(frame.spacing_mm[1]) else {
            warn!(
                "frame skipped: invalid row spacing {} mm",
                frame.spacing_mm[1]
            );
            self.stats.skipped_frames += 1;
            return Vec::new();
        };
        if frame.image_to_world.iter().any(|v| !v.is_finite()) {
            warn!("frame skipped: image-to-world transform is not finite");
            self.stats.skipped_frames += 1;
            return Vec::new();
        }

        let mut accepted = Vec::new();
        let mut candidates = 0usize;
        for i in 0..self.scanlines.len() {
            let scanline = self.scanlines.scanlines()[i];
            let candidate = match self.detect_on(&scanline, &frame.image, window) {
                Ok(Some(c)) => c,
                Ok(None) => continue,
                Err(reason) => {
                    self.stats.degenerate_scanlines += 1;
                    debug!(
                        "scanline {} skipped: {reason}",
                        self.scanlines.indices()[i]
                    );
                    continue;
                }
            };
            candidates += 1;

            let point = to_world(&candidate, &frame.image_to_world);
            if !self.proximity.accept(&point, self.points.as_slice()) {
                self.stats.too_close += 1;
                continue;
            }

            self.points.push(point);
            self.sink.add_point(point);
            accepted.push(point);
        }

        self.stats.candidates += candidates;
        self.stats.accepted += accepted.len();
        debug!(
            "frame {}: {} candidates, {} accepted, {} points total",
            self.stats.frames,
            candidates,
            accepted.len(),
            self.points.len()
        );

        accepted
    }

    fn detect_on<T: Copy + Into<f32>>(
        &mut self,
        scanline: &Scanline,
        image: &ImageView<'_, T>,
        window: DepthWindow,
    ) -> Result<Option<SurfaceCandidate>, DegenerateScanline> {
        let width = image.width();
        let column = scanline.column();
        let x = column
            .filter(|&x| x < width)
            .ok_or(DegenerateScanline::ColumnOutOfRange { x: column, width })?;

        let samples = image
            .gather_column_f32(x, &mut self.col_buf)
            .map_err(|_| DegenerateScanline::ColumnOutOfRange { x: column, width })?;

        self.detector
            .detect_checked(&PixelColumn::new(x, samples), window, self.config.threshold)
    }

    /// Depth window for the given row spacing, recomputed only when the
    /// spacing changes.
    fn depth_window(&mut self, spacing_mm: f64) -> Option<DepthWindow> {
        if let Some((cached_spacing, window)) = self.window
            && cached_spacing == spacing_mm
        {
            return Some(window);
        }

        let window = DepthWindow::from_mm(
            self.config.starting_depth_mm,
            self.config.ending_depth_mm,
            spacing_mm,
        )?;
        debug!(
            "depth window rows {}..{} at {spacing_mm} mm/px",
            window.start_px, window.end_px
        );
        self.window = Some((spacing_mm, window));
        Some(window)
    }

    /// Stops accepting frames. A configuring session also removes the points
    /// it placed.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if self.config.mode == SessionMode::Configuring {
            self.points.clear();
            self.sink.clear();
        }
        info!(
            "marker session stopped ({:?}): {} points after {} frames",
            self.config.mode,
            self.points.len(),
            self.stats.frames
        );
    }

    /// Resumes with an empty accumulated set. Points already handed to the
    /// sink stay there.
    pub fn restart(&mut self) {
        self.points.clear();
        self.stats = SessionStats::default();
        self.active = true;
        info!("marker session restarted ({:?})", self.config.mode);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn scanlines(&self) -> &ScanlineSet {
        &self.scanlines
    }

    pub fn points(&self) -> &AccumulatedPointSet {
        &self.points
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
