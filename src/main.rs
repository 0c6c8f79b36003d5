use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tilepair_cv::utils::ImageUtils;
use tilepair_cv::{MatchStatus, PipelineConfig};

mod hints;

/// Suggest eliminable tile pairs from a board screenshot
#[derive(Parser, Debug)]
#[command(name = "tilepair", version)]
struct Args {
    /// Screenshot of the board
    image: PathBuf,

    /// JSON pipeline configuration (overrides --preset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// strict, default, lenient, or auto to try them in that order
    #[arg(long, default_value = "auto")]
    preset: String,

    /// JSON list of {x, y, width, height} rectangles instead of edge proposals
    #[arg(long)]
    regions: Option<PathBuf>,

    /// Write the full result as JSON
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn configs_to_try(args: &Args) -> Result<Vec<(String, PipelineConfig)>> {
    if let Some(path) = &args.config {
        let config = PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config: {:?}", path))?;
        return Ok(vec![(path.display().to_string(), config)]);
    }

    if args.preset == "auto" {
        return Ok(["strict", "default", "lenient"]
            .into_iter()
            .filter_map(|name| PipelineConfig::preset(name).map(|c| (name.to_string(), c)))
            .collect());
    }

    match PipelineConfig::preset(&args.preset) {
        Some(config) => Ok(vec![(args.preset.clone(), config)]),
        None => bail!("Unknown preset '{}'", args.preset),
    }
}

fn run(args: &Args) -> Result<()> {
    let frame = ImageUtils::load_color(&args.image)
        .with_context(|| format!("Failed to load image: {:?}", args.image))?;
    let regions = hints::load_regions(&frame, args.regions.as_deref())?;
    let detection = hints::detect_hints(&frame, &regions, configs_to_try(args)?)?;
    let result = &detection.result;

    match result.status {
        MatchStatus::InsufficientDetections { count } => {
            println!("Not enough tiles detected ({} usable of {} regions)", count, regions.len());
        }
        MatchStatus::Completed => {
            println!(
                "Detected {} hint(s) with '{}' ({} tiles, {} ms):",
                result.pairs.len(),
                detection.preset,
                result.tiles.len(),
                result.stats.processing_time_ms
            );
            for pair in &result.pairs {
                let candidate = &pair.candidate;
                println!(
                    "  #{} tiles {} & {}  ({:.0},{:.0}) -> ({:.0},{:.0})  score {:.1}  turns {}",
                    pair.rank + 1,
                    candidate.a.id,
                    candidate.b.id,
                    candidate.a.center.x,
                    candidate.a.center.y,
                    candidate.b.center.x,
                    candidate.b.center.y,
                    candidate.score,
                    candidate.path.as_ref().map_or(0, |p| p.turns())
                );
            }
        }
    }

    if let Some(output) = &args.output {
        detection
            .detector
            .export_json(result, output)
            .with_context(|| format!("Failed to write JSON to: {:?}", output))?;
        println!("Result saved: {:?}", output);
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Detection failed: {:#}", e);
        std::process::exit(1);
    }
}
