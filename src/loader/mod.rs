//! Registry sources: delimited tables on disk or downloaded, and the
//! prebuilt cache.

pub mod cache;
pub mod download;
pub mod rows;
pub mod source;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::registry::{AlternateNames, Registry};

pub use rows::{parse_alternates, parse_rows, RowStats};
pub use download::fetch_source;
pub use source::read_text;

/// Build a registry from the configured row and alternate-name files
pub fn build_registry(config: &Config) -> Result<(Registry, RowStats)> {
    let data = &config.data;

    let alternates_path = data.alternates_path();
    let alternates = if alternates_path.exists() {
        let text = read_text(&alternates_path)
            .with_context(|| format!("Failed to read {}", alternates_path.display()))?;
        parse_alternates(&text, data)?
    } else {
        warn!(
            "Alternate names file not found: {}",
            alternates_path.display()
        );
        AlternateNames::new()
    };

    let registry_path = data.registry_path();
    let text = read_text(&registry_path)
        .with_context(|| format!("Failed to read {}", registry_path.display()))?;
    let (rows, stats) = parse_rows(&text, data, &config.columns)?;

    Ok((Registry::from_rows(rows, alternates), stats))
}

/// The cached registry when present and `rebuild` is false; otherwise a
/// registry built from the source files, written back to the cache. A
/// missing registry file is downloaded first when a URL is configured.
pub fn load_registry(config: &Config, rebuild: bool) -> Result<Registry> {
    let cache_path = config.data.cache_path();
    if !rebuild && cache_path.exists() {
        return cache::load(&cache_path)
            .with_context(|| format!("Failed to load cache {}", cache_path.display()));
    }

    let registry_path = config.data.registry_path();
    if !registry_path.exists() {
        match config.data.source_url() {
            Some(url) => fetch_source(&config.data, url)
                .with_context(|| format!("Failed to download {}", url))?,
            None => warn!("{} not found and no download URL configured", registry_path.display()),
        }
    }

    info!("Building registry from source files");
    let (registry, _) = build_registry(config)?;
    cache::save(&registry, &cache_path)
        .with_context(|| format!("Failed to write cache {}", cache_path.display()))?;
    Ok(registry)
}
