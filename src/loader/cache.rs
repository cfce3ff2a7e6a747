//! Prebuilt registry stored as gzip-compressed JSON.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::registry::Registry;

pub fn save(registry: &Registry, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, registry)?;
    encoder.finish()?.flush()?;

    info!(
        "Saved registry cache to {} ({} cities, {} streets)",
        path.display(),
        registry.city_count(),
        registry.street_count()
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<Registry> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let registry: Registry = serde_json::from_reader(BufReader::new(decoder))?;

    info!(
        "Loaded registry cache from {} ({} cities, {} streets, {} ranges)",
        path.display(),
        registry.city_count(),
        registry.street_count(),
        registry.range_count()
    );
    Ok(registry)
}
