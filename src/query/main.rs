//! Address extraction from the command line.
//!
//! Matches free text given as arguments, read from a file or from stdin,
//! or looks up postal codes, and prints one JSON feature per hypothesis.

use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use adreszoeker::config::Config;
use adreszoeker::loader::load_registry;
use adreszoeker::{MatchEngine, MatchOutcome};

mod feature;
use feature::features;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Extract Dutch addresses from free text")]
struct Args {
    /// Texts to match; read from --input or stdin when none are given
    texts: Vec<String>,

    /// File with one text per line
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Postal codes to look up instead of matching text
    #[arg(long)]
    postcode: Vec<String>,

    /// TOML configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory, overriding the configured one
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Rebuild the registry from source files instead of using the cache
    #[arg(long)]
    rebuild: bool,
}

fn read_texts(args: &Args) -> Result<Vec<String>> {
    if !args.texts.is_empty() {
        return Ok(args.texts.clone());
    }

    let lines: Vec<String> = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
            .lines()
            .map(str::to_string)
            .collect(),
        None => io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<_>>()
            .context("Failed to read stdin")?,
    };
    Ok(lines.into_iter().filter(|l| !l.trim().is_empty()).collect())
}

fn write_features(out: &mut impl Write, outcome: &MatchOutcome) -> Result<()> {
    for feature in features(outcome) {
        serde_json::to_writer(&mut *out, &feature)?;
        writeln!(out)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(dir) = &args.data_dir {
        config.data.dir = dir.clone();
    }

    let registry = load_registry(&config, args.rebuild)?;
    let engine = MatchEngine::new(registry)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if !args.postcode.is_empty() {
        for code in &args.postcode {
            let outcome = engine.find_by_postal_code(code)?;
            write_features(&mut out, &outcome)?;
        }
        out.flush()?;
        return Ok(());
    }

    let texts = read_texts(&args)?;
    info!("Matching {} texts", texts.len());

    let mut matched = 0;
    for outcome in engine.match_batch(&texts) {
        let outcome = outcome?;
        if outcome.resolved().next().is_some() {
            matched += 1;
        }
        write_features(&mut out, &outcome)?;
    }
    out.flush()?;

    info!("{} of {} texts resolved to an address", matched, texts.len());
    Ok(())
}
