use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::DynamicImage;
use log::{info, warn};
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};
use skull_marker::{
    FiducialList, Image, LinearArrayGeometry, MarkerSession, SessionConfig, SessionStats,
    UltrasoundFrame, compose_image_to_world, select_scanline_indices,
};

#[derive(Parser, Debug)]
#[command(name = "skull_marker")]
#[command(about = "Place skull surface fiducials on tracked ultrasound frames")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one placement session over an ordered list of PNG frames
    #[command(name = "run")]
    Run(RunArgs),
    /// Print the scanline indices a session would use
    #[command(name = "scanlines")]
    Scanlines(ScanlinesArgs),
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Frames in acquisition order
    #[arg(required = true)]
    frames: Vec<PathBuf>,
    /// Session configuration JSON; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Per-frame image-to-parent transforms: a JSON array of row-major 4x4
    /// matrices mapping pixel (column, row, 0, 1) to millimeters
    #[arg(long)]
    poses: Option<PathBuf>,
    /// Parent-to-world transform applied to every pose (row-major 4x4 JSON)
    #[arg(long)]
    parent: Option<PathBuf>,
    /// Pixel spacing in millimeters, used for the depth window and for the
    /// default poses
    #[arg(long, default_value_t = 0.1)]
    spacing: f64,
    /// Probe advance along z between frames when no poses are given
    #[arg(long, default_value_t = 1.0)]
    step_mm: f64,
    /// Scanlines of the probe; defaults to one per image column
    #[arg(long)]
    probe_scanlines: Option<usize>,
    /// Name of the output fiducial list
    #[arg(long, default_value = "Skull")]
    name: String,
    #[arg(long, default_value = "fiducials.json")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ScanlinesArgs {
    #[arg(long)]
    total: usize,
    #[arg(long)]
    count: usize,
}

type RowMajor4x4 = [f64; 16];

#[derive(Debug, Serialize)]
struct RunReport {
    frames: usize,
    config: SessionConfig,
    scanlines: Vec<usize>,
    stats: SessionStats,
    fiducials: FiducialList,
}

enum Frame {
    Narrow(Image<u8>),
    Wide(Image<u16>),
}

impl Frame {
    fn width(&self) -> usize {
        match self {
            Frame::Narrow(img) => img.width(),
            Frame::Wide(img) => img.width(),
        }
    }

    fn height(&self) -> usize {
        match self {
            Frame::Narrow(img) => img.height(),
            Frame::Wide(img) => img.height(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Run(args) => run_session(args),
        Command::Scanlines(args) => run_scanlines(args),
    }
}

fn run_session(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    let poses = match &args.poses {
        Some(path) => {
            let poses: Vec<RowMajor4x4> = read_json(path)?;
            if poses.len() != args.frames.len() {
                bail!(
                    "pose count mismatch: {} frames, {} poses.",
                    args.frames.len(),
                    poses.len()
                );
            }
            Some(poses)
        }
        None => None,
    };
    let parent = match &args.parent {
        Some(path) => Some(Matrix4::from_row_slice(&read_json::<RowMajor4x4>(path)?)),
        None => None,
    };

    let Some(first_path) = args.frames.first() else {
        bail!("no frames given.");
    };
    let first = load_frame(first_path)?;
    let (width, height) = (first.width(), first.height());
    let geometry = LinearArrayGeometry::new(
        args.probe_scanlines.unwrap_or(width),
        width,
        height,
    );

    let mut session = MarkerSession::builder(config.clone())
        .geometry(&geometry)
        .sink(FiducialList::new(args.name.clone()))
        .build()
        .context("starting marker session")?;
    info!("scanlines: {:?}", session.scanlines().indices());

    for (i, path) in args.frames.iter().enumerate() {
        let frame = if i == 0 { None } else { Some(load_frame(path)?) };
        let frame = frame.as_ref().unwrap_or(&first);
        if frame.width() != width || frame.height() != height {
            warn!(
                "{}: {}x{} differs from the first frame ({width}x{height})",
                path.display(),
                frame.width(),
                frame.height()
            );
        }

        let image_to_parent = match &poses {
            Some(poses) => Matrix4::from_row_slice(&poses[i]),
            None => default_pose(i, args.spacing, args.step_mm),
        };
        let image_to_world = compose_image_to_world(&image_to_parent, parent.as_ref());
        let spacing_mm = [args.spacing, args.spacing];

        let added = match frame {
            Frame::Narrow(img) => session.process_frame(&UltrasoundFrame {
                image: img.as_view(),
                spacing_mm,
                image_to_world,
            }),
            Frame::Wide(img) => session.process_frame(&UltrasoundFrame {
                image: img.as_view(),
                spacing_mm,
                image_to_world,
            }),
        };
        println!("{}: +{} fiducials", path.display(), added.len());
    }

    session.stop();
    let scanlines = session.scanlines().indices().to_vec();
    let stats = session.stats();
    let fiducials = session.into_sink();
    println!(
        "{} fiducials from {} frames ({} candidates, {} too close, {} skipped frames)",
        fiducials.len(),
        stats.frames,
        stats.candidates,
        stats.too_close,
        stats.skipped_frames
    );

    write_json(
        &args.out,
        &RunReport {
            frames: args.frames.len(),
            config,
            scanlines,
            stats,
            fiducials,
        },
    )?;
    println!("results written to {}", args.out.display());
    Ok(())
}

fn run_scanlines(args: ScanlinesArgs) -> Result<()> {
    let indices = select_scanline_indices(args.total, args.count)
        .with_context(|| format!("selecting {} of {} scanlines", args.count, args.total))?;
    println!("{}", serde_json::to_string(&indices)?);
    Ok(())
}

/// Pixel scaling in-plane, frames stacked along z.
fn default_pose(index: usize, spacing_mm: f64, step_mm: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(0.0, 0.0, index as f64 * step_mm))
        * Matrix4::new_nonuniform_scaling(&Vector3::new(spacing_mm, spacing_mm, 1.0))
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    ensure_file_exists(path, "config")?;
    read_json(path).with_context(|| format!("loading session config {}", path.display()))
}

fn load_frame(path: &Path) -> Result<Frame> {
    ensure_file_exists(path, "frame")?;
    let dyn_img =
        image::open(path).with_context(|| format!("opening frame {}", path.display()))?;

    let wide = matches!(
        dyn_img,
        DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_)
    );
    if wide {
        let luma = dyn_img.to_luma16();
        let (w, h) = luma.dimensions();
        let img = Image::from_vec(w as usize, h as usize, luma.into_raw())
            .with_context(|| format!("constructing 16-bit frame from {}", path.display()))?;
        return Ok(Frame::Wide(img));
    }

    let luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    let img = Image::from_vec(w as usize, h as usize, luma.into_raw())
        .with_context(|| format!("constructing 8-bit frame from {}", path.display()))?;
    Ok(Frame::Narrow(img))
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
