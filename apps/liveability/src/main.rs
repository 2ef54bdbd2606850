//! liveability — computes the liveability indicators of one simulation run.
//!
//! Reads the run's leg and trip exports, the study-area agents, and the road
//! network, runs the standard indicator modules, and writes the ledger,
//! summary tiles, indicator catalogue, and auxiliary tables to `--output`.
//!
//! ```text
//! liveability --run-dir output/run7 --study-area agents.csv \
//!     --network-nodes nodes.csv --network-links links.csv --output analysis
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use lv_core::LiveabilityConfig;
use lv_ledger::{CsvLedgerWriter, LedgerWriter};
use lv_network::load_network_csv;
use lv_pipeline::{InputPaths, LogObserver, PipelineBuilder, RunInputs};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    Csv,
    Sqlite,
    Parquet,
}

/// Liveability indicators for one simulation run.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding `*output_legs.csv[.gz]` and `*output_trips.csv[.gz]`.
    #[arg(long)]
    run_dir: PathBuf,

    /// Study-area agents: `person,home_x,home_y`.
    #[arg(long)]
    study_area: PathBuf,

    /// Network nodes: `id,x,y`.
    #[arg(long)]
    network_nodes: PathBuf,

    /// Network links: `id,from,to,length,freespeed,modes`.
    #[arg(long)]
    network_links: PathBuf,

    /// JSON configuration; every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory, created if missing.
    #[arg(long, default_value = "analysis")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = Backend::Csv)]
    backend: Backend,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => log::info!("finished."),
        Err(e) => {
            log::error!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<()> {
    let started = Instant::now();
    let config = load_config(args.config.as_deref())?;

    let network = load_network_csv(&args.network_nodes, &args.network_links).context("loading the road network")?;
    let paths = InputPaths::in_run_dir(&args.run_dir, &args.study_area)?;
    let inputs = RunInputs::load(&paths, &config)?;

    let mut pipeline = PipelineBuilder::new(config).standard_modules().build()?;
    let estimator = pipeline.estimator(&network)?;

    fs::create_dir_all(&args.output).with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = open_writer(args.backend, &args.output)?;
    let run = pipeline.execute(&estimator, &inputs, &mut LogObserver, writer.as_mut())?;

    log::info!(
        "{} agents, {} auxiliary tables, {} map layers in {:.1?}",
        run.outputs.ledger.len(),
        run.outputs.tables.len(),
        run.outputs.maps.len(),
        started.elapsed()
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LiveabilityConfig> {
    let Some(path) = path else {
        return Ok(LiveabilityConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: LiveabilityConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::info!("configuration loaded from {}", path.display());
    Ok(config)
}

fn open_writer(backend: Backend, dir: &Path) -> Result<Box<dyn LedgerWriter>> {
    match backend {
        Backend::Csv => Ok(Box::new(CsvLedgerWriter::new(dir)?)),
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => Ok(Box::new(lv_ledger::SqliteLedgerWriter::new(dir)?)),
        #[cfg(feature = "parquet")]
        Backend::Parquet => Ok(Box::new(lv_ledger::ParquetLedgerWriter::new(dir)?)),
        #[allow(unreachable_patterns)]
        other => bail!("backend `{other:?}` needs the `{}` feature", format!("{other:?}").to_lowercase()),
    }
}
