use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};

use facecheck_core::capture::infrastructure::image_file_reader::ImageFileReader;
use facecheck_core::capture::infrastructure::still_frame_source::StillFrameSource;
use facecheck_core::detection::domain::detection_outcome::DetectionReport;
use facecheck_core::detection::domain::region_merger::MergeStrategy;
use facecheck_core::detection::infrastructure::analyzer_factory::create_analyzer;
use facecheck_core::pipeline::capture_session::CaptureSession;
use facecheck_core::pipeline::session_logger::{
    NullSessionLogger, SessionLogger, StdoutSessionLogger,
};
use facecheck_core::shared::constants::IMAGE_EXTENSIONS;
use facecheck_core::shared::settings::DetectorSettings;

/// Checks photos for exactly one visible face using skin-tone analysis.
#[derive(Parser)]
#[command(name = "facecheck")]
struct Cli {
    /// Input image files, checked in order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Settings JSON file (default: the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the scanned blocks in pixels.
    #[arg(long)]
    block_size: Option<u32>,

    /// Minimum fraction of skin pixels for a block to count (0.0-1.0).
    #[arg(long)]
    min_skin_ratio: Option<f64>,

    /// Minimum number of skin pixels for a block to count.
    #[arg(long)]
    min_skin_pixels: Option<u32>,

    /// Merged regions need a confidence above this (0.0-1.0).
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Merged regions need an area above this, in square pixels.
    #[arg(long)]
    min_area: Option<i64>,

    /// How overlapping blocks are merged.
    #[arg(long, value_enum)]
    merge: Option<MergeArg>,

    /// Extra delay before each result is reported, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print one JSON report per input instead of a message.
    #[arg(long)]
    json: bool,

    /// Print per-stage timings when done.
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MergeArg {
    SinglePass,
    Transitive,
}

impl From<MergeArg> for MergeStrategy {
    fn from(arg: MergeArg) -> Self {
        match arg {
            MergeArg::SinglePass => MergeStrategy::SinglePass,
            MergeArg::Transitive => MergeStrategy::Transitive,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let settings = load_settings(&cli)?;
    let analyzer = create_analyzer(&[], &settings);

    let logger: Box<dyn SessionLogger> = if cli.summary {
        Box::new(StdoutSessionLogger::new())
    } else {
        Box::new(NullSessionLogger)
    };
    let source = StillFrameSource::new(cli.inputs.clone(), Box::new(ImageFileReader::new()));
    let mut session = CaptureSession::new(Box::new(source), analyzer, logger);
    log::info!(
        "Checking {} image(s) with {}",
        cli.inputs.len(),
        session.analyzer_name()
    );

    let mut failures = 0;
    for input in &cli.inputs {
        session.start_camera()?;
        match session.capture() {
            Ok(report) => print_report(input, &report, cli.json)?,
            Err(e) => {
                eprintln!("{}: detection failed: {e}", input.display());
                failures += 1;
            }
        }
        session.reset();
    }

    if cli.summary {
        session.logger().summary();
    }
    if failures > 0 {
        return Err(format!("{failures} of {} capture(s) failed", cli.inputs.len()).into());
    }
    Ok(())
}

fn print_report(
    input: &Path,
    report: &DetectionReport,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!("{}: {}", input.display(), report.outcome.message());
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<DetectorSettings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.config {
        Some(path) => DetectorSettings::load(path)?,
        None => DetectorSettings::load_default()?,
    };
    apply_overrides(cli, &mut settings);
    settings.validate()?;
    Ok(settings)
}

fn apply_overrides(cli: &Cli, settings: &mut DetectorSettings) {
    if let Some(block_size) = cli.block_size {
        settings.block_size = block_size;
    }
    if let Some(ratio) = cli.min_skin_ratio {
        settings.min_skin_ratio = ratio;
    }
    if let Some(pixels) = cli.min_skin_pixels {
        settings.min_skin_pixels = pixels;
    }
    if let Some(confidence) = cli.min_confidence {
        settings.min_confidence = confidence;
    }
    if let Some(area) = cli.min_area {
        settings.min_area = area;
    }
    if let Some(merge) = cli.merge {
        settings.merge_strategy = merge.into();
    }
    if let Some(delay_ms) = cli.delay_ms {
        settings.processing_delay_ms = delay_ms;
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for input in &cli.inputs {
        if !input.exists() {
            return Err(format!("Input file not found: {}", input.display()).into());
        }
        if !is_image(input) {
            return Err(format!("Not a supported image file: {}", input.display()).into());
        }
    }
    if let Some(config) = &cli.config {
        if !config.exists() {
            return Err(format!("Config file not found: {}", config.display()).into());
        }
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
