use anyhow::{Context, Result};
use clap::Parser;
use ecosim_core::config::AppConfig;
use ecosim_lib::app::{self, DEFAULT_HEADLESS_FRAMES};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "standard")]
    mode: Mode,

    /// Custom config file path (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame limit for headless runs
    #[arg(short, long)]
    frames: Option<u64>,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    Standard,
    Headless,
}

const LOG_FILE: &str = "ecosim.log";

fn main() -> Result<()> {
    let args = Args::parse();

    match args.mode {
        Mode::Headless => ecosim_core::init_logging(),
        Mode::Standard => ecosim_core::init_file_logging(Path::new(LOG_FILE))
            .with_context(|| format!("Failed to open {LOG_FILE}"))?,
    }

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load(),
    };
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }

    tracing::info!(mode = ?args.mode, seed = ?config.world.seed, "Starting ecosim");

    let summary = match args.mode {
        Mode::Headless => {
            let frames = args.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES);
            let summary = app::run_headless(config, frames)?;
            println!(
                "Ran {} frames: {} grass, {} lemmings, {} foxes",
                summary.frames,
                summary.population.grass,
                summary.population.lemmings,
                summary.population.foxes
            );
            summary
        }
        Mode::Standard => app::run_terminal(config)?,
    };

    tracing::info!(frames = summary.frames, "Exited clean");
    Ok(())
}
