//! Registry ingest pipeline.
//!
//! Reads the address range table and the alternate city names, builds the
//! registry and writes it to the cache used by `query`.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use adreszoeker::config::Config;
use adreszoeker::loader::{build_registry, cache, fetch_source};
use adreszoeker::MatchEngine;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Build the address registry cache from source tables")]
struct Args {
    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory, overriding the configured one
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Registry file, overriding the configured one
    #[arg(long)]
    file: Option<PathBuf>,

    /// Build even when a cache already exists
    #[arg(long)]
    force: bool,

    /// Download the registry file first, replacing a local copy
    #[arg(long)]
    download: bool,

    /// Also build the match automata to check the registry is usable
    #[arg(long)]
    verify: bool,
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data.dir = dir;
    }
    if let Some(file) = args.file {
        config.data.registry_file = file;
    }

    info!("Adreszoeker Ingest");
    info!("Registry file: {}", config.data.registry_path().display());

    let cache_path = config.data.cache_path();
    if cache_path.exists() && !args.force && !args.download {
        info!(
            "Cache {} already exists, use --force to rebuild",
            cache_path.display()
        );
        return Ok(());
    }

    let start = Instant::now();

    let registry_path = config.data.registry_path();
    if args.download || !registry_path.exists() {
        let url = config
            .data
            .source_url()
            .with_context(|| format!("{} not found and no download URL configured", registry_path.display()))?;
        let pb = spinner("Downloading registry table")?;
        fetch_source(&config.data, url).with_context(|| format!("Failed to download {}", url))?;
        pb.finish_with_message("Registry table downloaded");
    }

    let pb = spinner("Reading source tables")?;
    let (registry, stats) = build_registry(&config)?;
    pb.finish_with_message(format!(
        "{} rows read, {} kept, {} skipped",
        stats.read, stats.kept, stats.skipped
    ));

    info!(
        "Registry: {} cities, {} streets, {} ranges, {} alternate spellings",
        registry.city_count(),
        registry.street_count(),
        registry.range_count(),
        registry.alternates().len()
    );

    let pb = spinner("Writing cache")?;
    cache::save(&registry, &cache_path)
        .with_context(|| format!("Failed to write cache {}", cache_path.display()))?;
    pb.finish_with_message("Cache written");

    if args.verify {
        let pb = spinner("Building match automata")?;
        MatchEngine::new(registry).context("Registry cannot be matched against")?;
        pb.finish_with_message("Match automata built");
    }

    info!("Ingest complete in {:.1?}", start.elapsed());
    Ok(())
}
