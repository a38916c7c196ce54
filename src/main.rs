use anyhow::Context;
use clap::{Parser, Subcommand};
use image_verify::config::{load_config_or_default, AnalysisConfig, Config};
use image_verify::metadata::{read_orientation, ExifTool};
use image_verify::*;
use instant::Instant;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "imgverify")]
#[command(about = "Deterministic measurements for verifying processed images")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sum of squared pixel differences between two images
    Diff {
        expected: PathBuf,
        actual: PathBuf,

        /// Compare only the overlapping region when sizes differ
        #[arg(long)]
        overlap: bool,

        /// Highest score still considered a match
        #[arg(long)]
        max_difference: Option<u64>,
    },

    /// Check that every pixel is achromatic
    Grayscale { image: PathBuf },

    /// Measure the dark border on each edge
    Borders {
        image: PathBuf,

        /// Expected top, bottom, left, right thickness
        #[arg(long, num_args = 4, value_names = ["TOP", "BOTTOM", "LEFT", "RIGHT"])]
        expect: Option<Vec<u32>>,
    },

    /// List chunk tags of a PNG-style container
    Chunks {
        file: PathBuf,

        /// Expected tag sequence, comma-separated
        #[arg(long, value_delimiter = ',')]
        expect: Option<Vec<String>>,
    },

    /// Report dimensions and MIME type without decoding pixels
    Probe {
        image: PathBuf,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        /// Expected format, e.g. `png` or `webp`
        #[arg(long)]
        format: Option<String>,
    },

    /// Read the EXIF orientation via the metadata tool
    Orientation {
        image: PathBuf,

        #[arg(long)]
        expect: Option<u64>,
    },
}

/// Verdict of one check, printed as the command output.
#[derive(Debug, Serialize)]
struct Verdict<T: Serialize> {
    check: &'static str,
    subject: String,
    pass: bool,
    value: T,
    elapsed_ms: f32,
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    width: u32,
    height: u32,
    mime: Option<&'static str>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config_or_default(cli.config.as_deref());

    let logging = config.logging.clone().with_verbosity(cli.verbose);
    let _guard = match image_verify::logging::init_logging(&logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            None
        }
    };

    match run(cli.command, &config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands, config: &Config) -> anyhow::Result<bool> {
    image_verify::logging::new_correlation_id();
    let span = image_verify::correlation_span!(tracing::Level::INFO, "command");
    let _entered = span.enter();

    match command {
        Commands::Diff { expected, actual, overlap, max_difference } => {
            let (overlap, max) = diff_settings(overlap, max_difference, &config.analysis);
            handle_diff(&expected, &actual, overlap, max)
        }
        Commands::Grayscale { image } => handle_grayscale(&image),
        Commands::Borders { image, expect } => handle_borders(&image, expect.as_deref()),
        Commands::Chunks { file, expect } => handle_chunks(&file, expect.as_deref()),
        Commands::Probe { image, width, height, format } => {
            handle_probe(&image, width, height, format.as_deref())
        }
        Commands::Orientation { image, expect } => handle_orientation(&image, expect, config),
    }
}

fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_raster(path: &Path) -> anyhow::Result<image::DynamicImage> {
    let bytes = read_bytes(path)?;
    decode(&bytes).with_context(|| format!("Failed to decode {}", path.display()))
}

fn emit<T: Serialize>(
    check: &'static str,
    subject: &Path,
    pass: bool,
    value: T,
    start: Instant,
) -> anyhow::Result<bool> {
    let verdict = Verdict {
        check,
        subject: subject.display().to_string(),
        pass,
        value,
        elapsed_ms: start.elapsed().as_secs_f32() * 1000.0,
    };
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    tracing::info!(check, pass, "Check finished");
    Ok(pass)
}

/// Command-line flags win over the configured defaults.
fn diff_settings(overlap: bool, max_difference: Option<u64>, config: &AnalysisConfig) -> (bool, u64) {
    (
        overlap || config.overlap_only,
        max_difference.unwrap_or(config.max_difference),
    )
}

fn borders_match(metrics: &BorderMetrics, expect: Option<&[u32]>) -> bool {
    let (top, bottom, left, right) = metrics.as_tuple();
    expect.map_or(true, |e| e == [top, bottom, left, right])
}

fn chunks_match(tags: &[ChunkTag], expect: Option<&[String]>) -> bool {
    expect.map_or(true, |e| {
        e.len() == tags.len() && tags.iter().zip(e).all(|(tag, want)| *tag == want.as_str())
    })
}

fn probe_matches(
    report: &ProbeReport,
    width: Option<u32>,
    height: Option<u32>,
    format: Option<&str>,
) -> bool {
    width.map_or(true, |want| want == report.width)
        && height.map_or(true, |want| want == report.height)
        && format.map_or(true, |want| report.mime == Some(format!("image/{want}").as_str()))
}

fn handle_diff(expected: &Path, actual: &Path, overlap: bool, max: u64) -> anyhow::Result<bool> {
    let start = Instant::now();
    let a = load_raster(expected)?;
    let b = load_raster(actual)?;

    let score = compare(&a, &b, overlap)?;
    emit("diff", actual, score <= max, score, start)
}

fn handle_grayscale(path: &Path) -> anyhow::Result<bool> {
    let start = Instant::now();
    let raster = load_raster(path)?;

    let gray = is_grayscale(&raster);
    emit("grayscale", path, gray, gray, start)
}

fn handle_borders(path: &Path, expect: Option<&[u32]>) -> anyhow::Result<bool> {
    let start = Instant::now();
    let raster = load_raster(path)?;

    let metrics = scan_borders(&raster);
    let pass = borders_match(&metrics, expect);
    emit("borders", path, pass, metrics, start)
}

fn handle_chunks(path: &Path, expect: Option<&[String]>) -> anyhow::Result<bool> {
    let start = Instant::now();
    let bytes = read_bytes(path)?;

    let tags = list_chunks(&bytes);
    let pass = chunks_match(&tags, expect);
    emit("chunks", path, pass, tags, start)
}

fn handle_probe(
    path: &Path,
    width: Option<u32>,
    height: Option<u32>,
    format: Option<&str>,
) -> anyhow::Result<bool> {
    let start = Instant::now();
    let bytes = read_bytes(path)?;

    let (w, h) = image_dimensions(&bytes)?;
    let report = ProbeReport { width: w, height: h, mime: detect_mime(&bytes) };
    let pass = probe_matches(&report, width, height, format);
    emit("probe", path, pass, report, start)
}

fn handle_orientation(path: &Path, expect: Option<u64>, config: &Config) -> anyhow::Result<bool> {
    let start = Instant::now();
    let bytes = read_bytes(path)?;

    let tool = ExifTool::from(&config.metadata);
    let orientation = read_orientation(&tool, &bytes)?;
    let pass = expect.map_or(true, |want| orientation == Some(want));
    emit("orientation", path, pass, orientation, start)
}
