use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use moddyno::engine::{AggregationMode, EngineTuning, compute_performance};
use moddyno::errors::ModdynoError;
use moddyno::lap::{InMemoryLapData, LapEstimateRequest, LapTimeEstimator};
use moddyno::{CarProfile, ModCatalog};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute gains and derived metrics for a modification build
    Compute {
        /// Car stock profile JSON file
        #[arg(short, long)]
        profile: PathBuf,

        /// Selected modification keys, comma separated
        #[arg(short, long, value_delimiter = ',')]
        mods: Vec<String>,

        /// Use engine-family-aware aggregation
        #[arg(long)]
        advanced: bool,

        /// Catalog JSON file; the built-in catalog is used when omitted
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Write the computation to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Estimate a lap time from a request file and a lap dataset
    Lap {
        /// Lap estimate request JSON file
        #[arg(short, long)]
        request: PathBuf,

        /// Lap dataset (JSONL, one record/reference/similar entry per line)
        #[arg(short = 'd', long)]
        records: PathBuf,

        /// Write the estimate to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn emit(json: String, output: Option<PathBuf>) -> Result<(), ModdynoError> {
    match output {
        Some(path) => {
            std::fs::write(path, json).map_err(|e| ModdynoError::OutputIOError { source: e })
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn compute(
    profile_path: PathBuf,
    mods: Vec<String>,
    advanced: bool,
    catalog_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), ModdynoError> {
    let profile_file =
        File::open(profile_path).map_err(|e| ModdynoError::ProfileIOError { source: e })?;
    let profile: CarProfile = serde_json::from_reader(profile_file)
        .map_err(|e| ModdynoError::ProfileParseError { source: e })?;

    let catalog = match catalog_path {
        Some(path) => ModCatalog::from_json_file(&path)?,
        None => ModCatalog::builtin(),
    };
    let tuning = EngineTuning::from_local_file().unwrap_or_default();
    let mode = if advanced {
        AggregationMode::Advanced
    } else {
        AggregationMode::Basic
    };

    let computation = compute_performance(&profile, &mods, mode, &catalog, &tuning);
    for warning in &computation.gain.warnings {
        log::warn!("{warning}");
    }
    log::info!(
        "net gain: {:.1} hp / {:.1} lb-ft across {} categories",
        computation.gain.hp_gain,
        computation.gain.torque_gain,
        computation.gain.categories.len()
    );

    let json = serde_json::to_string_pretty(&computation)
        .map_err(|e| ModdynoError::OutputSerializeError { source: e })?;
    emit(json, output)
}

fn lap(
    request_path: PathBuf,
    records_path: PathBuf,
    output: Option<PathBuf>,
) -> Result<(), ModdynoError> {
    let request_file =
        File::open(request_path).map_err(|e| ModdynoError::ProfileIOError { source: e })?;
    let request: LapEstimateRequest = serde_json::from_reader(request_file)
        .map_err(|e| ModdynoError::ProfileParseError { source: e })?;

    let data = InMemoryLapData::from_jsonl_file(&records_path)?;
    let estimator = LapTimeEstimator::new(data, EngineTuning::from_local_file().unwrap_or_default());
    let estimate = estimator.estimate(&request);
    log::info!("{} at {}: {}", request.car_id, request.track_id, estimate.tier);

    let json = serde_json::to_string_pretty(&estimate)
        .map_err(|e| ModdynoError::OutputSerializeError { source: e })?;
    emit(json, output)
}

fn main() {
    colog::init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Compute {
            profile,
            mods,
            advanced,
            catalog,
            output,
        } => compute(profile, mods, advanced, catalog, output),
        Commands::Lap {
            request,
            records,
            output,
        } => lap(request, records, output),
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
