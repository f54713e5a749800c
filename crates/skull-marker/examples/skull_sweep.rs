//! Example: fiducial placement over a synthetic probe sweep.
//!
//! Renders a sequence of B-mode frames of a curved bone surface, moving the
//! probe along the world z axis between frames, and runs one placement
//! session over the whole sweep. Each frame carries its own image-to-world
//! transform: pixel spacing in-plane, sweep offset out of plane.
//!
//! The resulting fiducial list and session stats are written to JSON.
//!
//! Run from the workspace root:
//!   cargo run -p skull-marker --example skull_sweep -- --help
//!   cargo run -p skull-marker --example skull_sweep -- --scanlines 9

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::{Matrix4, Vector3};
use serde::Serialize;
use skull_marker::{
    FiducialList, Image, LinearArrayGeometry, MarkerSession, SessionConfig, SessionStats,
    UltrasoundFrame,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Place skull fiducials on a synthetic ultrasound sweep")]
struct Args {
    /// Number of frames in the sweep
    #[arg(long, default_value_t = 40)]
    frames: usize,

    /// Probe advance between frames, in millimeters
    #[arg(long, default_value_t = 0.5)]
    step_mm: f64,

    /// Scanlines used per frame
    #[arg(long, default_value_t = 5)]
    scanlines: usize,

    /// Bone intensity threshold
    #[arg(long, default_value_t = 200.0)]
    threshold: f32,

    /// Minimum distance between fiducials, in millimeters
    #[arg(long, default_value_t = 2.0)]
    min_distance: f64,

    /// Output JSON path
    #[arg(long, default_value = "skull_sweep.json")]
    out: String,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SweepResult {
    frames: usize,
    elapsed_ms: f64,
    stats: SessionStats,
    fiducials: FiducialList,
}

// ── Synthetic frames ──────────────────────────────────────────────────────────

const WIDTH: usize = 128;
const HEIGHT: usize = 160;
const SPACING_MM: f64 = 0.1;

/// Bone depth in rows under column `x` at sweep position `z_mm`: a shallow
/// dome that sinks as the probe moves away from the apex.
fn bone_row(x: usize, z_mm: f64) -> usize {
    let dx = (x as f64 - WIDTH as f64 / 2.0) * SPACING_MM;
    let depth_mm = 4.0 + 0.02 * dx * dx + 0.01 * z_mm * z_mm;
    (depth_mm / SPACING_MM).round() as usize
}

fn render_frame(z_mm: f64) -> Image<u8> {
    Image::from_fn(WIDTH, HEIGHT, |x, y| {
        let bone = bone_row(x, z_mm);
        if y == bone {
            240
        } else if y.abs_diff(bone) <= 3 {
            130
        } else {
            ((x * 31 + y * 17) % 40) as u8
        }
    })
}

fn frame_to_world(z_mm: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(0.0, 0.0, z_mm))
        * Matrix4::new_nonuniform_scaling(&Vector3::new(SPACING_MM, SPACING_MM, 1.0))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SessionConfig {
        threshold: args.threshold,
        min_distance_mm: args.min_distance,
        scanline_count: args.scanlines,
        ..SessionConfig::default()
    };
    println!(
        "sweep: {} frames x {:.2} mm, {WIDTH}x{HEIGHT} px at {SPACING_MM} mm/px",
        args.frames, args.step_mm
    );

    let geometry = LinearArrayGeometry::new(WIDTH, WIDTH, HEIGHT);
    let mut session = MarkerSession::builder(config)
        .geometry(&geometry)
        .sink(FiducialList::new("Skull"))
        .build()
        .context("starting marker session")?;
    println!("scanlines: {:?}", session.scanlines().indices());

    let total_start = Instant::now();
    for i in 0..args.frames {
        let z_mm = i as f64 * args.step_mm;
        let img = render_frame(z_mm);
        let frame = UltrasoundFrame {
            image: img.as_view(),
            spacing_mm: [SPACING_MM, SPACING_MM],
            image_to_world: frame_to_world(z_mm),
        };

        let added = session.process_frame(&frame);
        if !added.is_empty() {
            println!("  frame {i:>3} (z={z_mm:5.1} mm): +{}", added.len());
        }
    }
    let elapsed_ms = total_start.elapsed().as_secs_f64() * 1e3;

    session.stop();
    let stats = session.stats();
    let fiducials = session.into_sink();
    println!(
        "{} fiducials from {} candidates ({} too close) in {elapsed_ms:.2} ms",
        fiducials.len(),
        stats.candidates,
        stats.too_close
    );

    let result = SweepResult {
        frames: args.frames,
        elapsed_ms,
        stats,
        fiducials,
    };
    let out_file =
        std::fs::File::create(&args.out).with_context(|| format!("creating {}", args.out))?;
    serde_json::to_writer_pretty(out_file, &result)
        .with_context(|| format!("writing JSON to {}", args.out))?;

    println!("results written to {}", args.out);
    Ok(())
}
