use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{ArgAction, Parser};

use medmark::detect::{HeatmapDetector, NpyHeatmaps};
use medmark::format::{self, ExportOptions, FormatRegistry};
use medmark::measure::measurements;
use medmark::render::pivot_summary;
use medmark::{Annotator, EngineConfig, Size};

/// Image size assumed when no image is given.
const FALLBACK_SIZE: &str = "4096x4096";

#[derive(Parser, Debug)]
#[command(name = "medmark-report")]
#[command(version, about = "Measurement report for medical image landmark annotations")]
struct Cli {
    /// Annotation file (full or pivots-only JSON)
    annotations: Option<PathBuf>,

    /// Image the annotations belong to; sets the source size
    #[arg(long, short = 'i', value_name = "PATH")]
    image: Option<PathBuf>,

    /// Source size as WIDTHxHEIGHT when no image is given
    #[arg(long, value_name = "WxH", default_value = FALLBACK_SIZE, value_parser = parse_size)]
    size: Size,

    /// Precomputed keypoint heatmaps (.npy) to add landmarks from
    #[arg(long, value_name = "PATH", requires = "image")]
    heatmaps: Option<PathBuf>,

    /// Write the resulting annotations to this file
    #[arg(long, short = 'e', value_name = "PATH")]
    export: Option<PathBuf>,

    /// Export only the pivots
    #[arg(long, action = ArgAction::SetTrue, requires = "export")]
    pivots_only: bool,

    /// Print measurements as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Engine configuration file
    #[arg(long, short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,
}

fn parse_size(value: &str) -> Result<Size, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |s: &str| s.trim().parse::<u32>().map_err(|e| format!("invalid size '{value}': {e}"));
    let size = Size::new(parse(w)?, parse(h)?);
    if size.is_empty() {
        return Err(format!("size must be non-zero, got '{value}'"));
    }
    Ok(size)
}

/// Load the given config, else the one at the default path if it exists.
///
/// Runs before the logger is installed, so a broken file is an error
/// rather than a warning nobody sees.
fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match EngineConfig::default_path().filter(|path| path.exists()) {
            Some(path) => path,
            None => return Ok(EngineConfig::default()),
        },
    };
    EngineConfig::load(&path).with_context(|| format!("loading config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    if cli.annotations.is_none() && cli.heatmaps.is_none() {
        bail!("nothing to report: give an annotation file or --heatmaps");
    }

    let image = cli
        .image
        .as_deref()
        .map(|path| image::open(path).with_context(|| format!("opening image {}", path.display())))
        .transpose()?;
    let source = image
        .as_ref()
        .map_or(cli.size, |image| Size::new(image.width(), image.height()));

    // View at source resolution, so view and source pixels coincide.
    let mut annotator = Annotator::new(config);
    annotator.load_image(source, source);

    if let Some(path) = &cli.annotations {
        format::import_file(&mut annotator, path)
            .with_context(|| format!("importing {}", path.display()))?;
    }

    if let (Some(path), Some(image)) = (&cli.heatmaps, &image) {
        let model = NpyHeatmaps::load(path).with_context(|| format!("reading heatmaps {}", path.display()))?;
        let detector = HeatmapDetector::new(model);
        let added = annotator.auto_add_points(&detector, image)?;
        println!("Detected {} landmarks", added.len());
    }

    print_report(&annotator, source, cli.json)?;

    if let Some(path) = &cli.export {
        let id = if cli.pivots_only { "pivots" } else { "full" };
        let registry = FormatRegistry::new();
        let exporter = registry
            .get(id)
            .with_context(|| format!("unknown export format '{id}'"))?;
        let options = ExportOptions::from_config(annotator.config());
        exporter
            .export(&annotator, path, &options)
            .with_context(|| format!("exporting {}", path.display()))?;
        println!("Exported {} to {}", exporter.display_name(), path.display());
    }

    Ok(())
}

fn print_report(annotator: &Annotator, source: Size, json: bool) -> anyhow::Result<()> {
    let found = measurements(annotator);
    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    let store = annotator.store();
    println!("Image: {}x{}", source.width, source.height);
    println!(
        "Points: {}, lines: {}, angles: {}, circles: {}, pivots: {}",
        store.point_count(),
        store.line_count(),
        store.angle_count(),
        store.circle_count(),
        store.pivot_count()
    );

    if !found.is_empty() {
        println!("Measurements:");
        for measurement in &found {
            println!("  {}", measurement.describe());
        }
    }

    let pivots = pivot_summary(annotator);
    if !pivots.is_empty() {
        println!("Pivots:");
        for line in pivots {
            println!("  {line}");
        }
    }
    Ok(())
}
