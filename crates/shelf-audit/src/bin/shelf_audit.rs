use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use shelf_audit::core::{init_with_level, Detection};
use shelf_audit::{analyze, detect_grid, AnalyzeParams, Planogram};

#[derive(Parser)]
#[command(name = "shelf-audit", about = "Planogram compliance auditing for shelf photos")]
struct Cli {
    /// Log level: off, error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,

    /// Pipeline parameter overrides as a JSON file.
    #[arg(long)]
    params: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Infer the shelf grid only (strict; fails without grid evidence).
    Grid {
        /// Shelf photo to analyze.
        image: PathBuf,
    },
    /// Full compliance analysis against a planogram.
    Analyze {
        /// Shelf photo to analyze.
        image: PathBuf,
        /// Planogram JSON file.
        #[arg(long)]
        planogram: PathBuf,
        /// Detections JSON file (list of {label, box, confidence}).
        #[arg(long)]
        detections: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_with_level(cli.log_level)?;

    let params: AnalyzeParams = match &cli.params {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => AnalyzeParams::default(),
    };

    let output = match &cli.command {
        Command::Grid { image } => {
            let gray = shelf_audit::imageio::load_gray(image)?;
            let report = detect_grid(&gray.view(), &params)?;
            serde_json::to_value(report)?
        }
        Command::Analyze {
            image,
            planogram,
            detections,
        } => {
            let gray = shelf_audit::imageio::load_gray(image)?;
            let planogram: Planogram = serde_json::from_str(&fs::read_to_string(planogram)?)?;
            let detections: Vec<Detection> =
                serde_json::from_str(&fs::read_to_string(detections)?)?;
            let report = analyze(&gray.view(), &planogram, &detections, &params)?;
            serde_json::to_value(report)?
        }
    };

    if cli.pretty {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{output}");
    }
    Ok(())
}
