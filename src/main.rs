use anyhow::{Context, Result};
use clap::Parser;
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::info;
use tracing_subscriber::EnvFilter;
use virtual_pet::{app, config};

#[derive(Parser)]
#[command(about = "A virtual pet that lives in your terminal")]
struct Args {
    /// pet name (default from settings, then "Fluffy")
    #[arg(long)]
    name: Option<String>,

    /// seed for the rename dice
    #[arg(long)]
    seed: Option<u64>,

    /// milliseconds between decay ticks
    #[arg(long)]
    decay_ms: Option<u64>,

    /// milliseconds between animation frames
    #[arg(long)]
    frame_ms: Option<u64>,

    /// sleep is refused at or above this much energy
    #[arg(long)]
    sleep_threshold: Option<u8>,

    /// settings file to read instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// log file (defaults to the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// monochrome output
    #[arg(long)]
    no_color: bool,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let paths = config::project_paths()?;

    let log_path = args.log_file.clone().unwrap_or(paths.log_path);
    init_tracing(&log_path)?;

    let settings_path = args.config.clone().unwrap_or(paths.settings_path);
    let mut settings = config::load_settings(&settings_path);
    if let Some(name) = args.name {
        settings.name = name;
    }
    if let Some(ms) = args.decay_ms {
        settings.decay_interval_ms = ms;
    }
    if let Some(ms) = args.frame_ms {
        settings.frame_interval_ms = ms;
    }
    if let Some(t) = args.sleep_threshold {
        settings.sleep_threshold = t;
    }
    if args.no_color {
        settings.enable_color = false;
    }
    settings.validate().context("invalid settings")?;

    let seed = args.seed.or(settings.seed).unwrap_or_else(rand::random);
    info!(settings = %settings_path.display(), seed, "starting");

    app::run(settings, seed)
}
