//! vidsheet CLI - render video frames as colored spreadsheet grids

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vidsheet::{convert, ConvertOptions, FfmpegFrameSource, ResizeFilter};

#[derive(Parser)]
#[command(name = "vidsheet")]
#[command(
    author,
    version,
    about = "Convert a video into an xlsx file, one worksheet of colored cells per sampled frame"
)]
struct Cli {
    /// Path to the input video file
    #[arg(short, long)]
    input: PathBuf,

    /// Path to the output xlsx file
    #[arg(short, long)]
    output: PathBuf,

    /// Number of colors per frame
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    colors: u32,

    /// Sample every Nth decoded frame
    #[arg(short = 'f', long = "frame", value_parser = clap::value_parser!(u64).range(1..))]
    frame_interval: u64,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Show debug and troubleshooting information
    #[arg(short, long)]
    debug: bool,

    /// Fix the clustering seed so repeated runs produce the same palette
    #[arg(long)]
    seed: Option<u64>,

    /// Interpolation used when downscaling frames
    #[arg(long, value_enum, default_value_t = FilterArg::Cubic)]
    filter: FilterArg,

    /// Keep a PNG of the latest quantized frame at this path while
    /// converting
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterArg {
    /// Catmull-Rom bicubic
    Cubic,
    /// Bilinear
    Linear,
}

impl From<FilterArg> for ResizeFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Cubic => ResizeFilter::Bicubic,
            FilterArg::Linear => ResizeFilter::Bilinear,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    let source = FfmpegFrameSource::open(&cli.input)
        .with_context(|| format!("failed to open '{}'", cli.input.display()))?;
    tracing::info!(input = %cli.input.display(), "opened video stream");

    let mut options = ConvertOptions::new(cli.colors as usize, cli.frame_interval);
    options.seed = cli.seed;
    options.filter = cli.filter.into();
    options.preview = cli.preview;

    let report = convert(source, &cli.output, &options)
        .with_context(|| format!("failed to write '{}'", cli.output.display()))?;

    println!(
        "{} worksheets, {} distinct colors -> {}",
        report.sheets_written,
        report.distinct_colors,
        cli.output.display()
    );
    Ok(())
}

fn init_logging(verbose: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .without_time()
        .init();
}
