use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Zipped registry table published by postcodedata.nl
pub const DATA_URL: &str = "http://download.postcodedata.nl/data/postcode_NL.csv.zip";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub columns: ColumnMap,
}

/// Where the registry sources and cache live, and how rows are split.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
    pub registry_file: PathBuf,
    pub alternates_file: PathBuf,
    pub cache_file: PathBuf,
    pub delimiter: String,
    pub has_headers: bool,
    /// Fetched when the registry file is missing; empty disables fetching
    pub url: String,
    pub http_timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            registry_file: PathBuf::from("postcode_NL.csv"),
            alternates_file: PathBuf::from("plaatsnamen_schrijfwijze.csv"),
            cache_file: PathBuf::from("adressenbestand.json.gz"),
            delimiter: ";".to_string(),
            has_headers: false,
            url: DATA_URL.to_string(),
            http_timeout_secs: 120,
        }
    }
}

impl DataConfig {
    pub fn registry_path(&self) -> PathBuf {
        self.dir.join(&self.registry_file)
    }

    pub fn alternates_path(&self) -> PathBuf {
        self.dir.join(&self.alternates_file)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.dir.join(&self.cache_file)
    }

    pub fn source_url(&self) -> Option<&str> {
        Some(self.url.trim()).filter(|u| !u.is_empty())
    }

    /// Field delimiter as the single byte the csv reader wants
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => bail!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ),
        }
    }
}

/// Zero-based field positions in a registry row
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnMap {
    pub postal_code: usize,
    pub min_number: usize,
    pub max_number: usize,
    pub number_type: usize,
    pub street: usize,
    pub city: usize,
    pub x: usize,
    pub y: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            postal_code: 1,
            min_number: 5,
            max_number: 6,
            number_type: 7,
            street: 8,
            city: 9,
            x: 17,
            y: 18,
        }
    }
}

impl ColumnMap {
    /// Smallest field count a row needs to cover every column
    pub fn width(&self) -> usize {
        [
            self.postal_code,
            self.min_number,
            self.max_number,
            self.number_type,
            self.street,
            self.city,
            self.x,
            self.y,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        config.data.delimiter_byte()?;
        Ok(config)
    }

    /// The file at `path` if given, the defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"").unwrap();
        let config = Config::load_from_file(file.path()).unwrap();

        assert_eq!(config.columns, ColumnMap::default());
        assert_eq!(config.data.cache_path(), Path::new("data/adressenbestand.json.gz"));
        assert_eq!(config.data.delimiter_byte().unwrap(), b';');
        assert!(!config.data.has_headers);
        assert_eq!(config.data.source_url(), Some(DATA_URL));
    }

    #[test]
    fn test_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[data]\ndir = \"/srv/bag\"\ndelimiter = \",\"\n\n[columns]\ncity = 2\nstreet = 3"
        )
        .unwrap();
        let config = Config::load_from_file(file.path()).unwrap();

        assert_eq!(config.data.registry_path(), Path::new("/srv/bag/postcode_NL.csv"));
        assert_eq!(config.data.delimiter_byte().unwrap(), b',');
        assert_eq!(config.columns.city, 2);
        assert_eq!(config.columns.street, 3);
        assert_eq!(config.columns.y, 18);
    }

    #[test]
    fn test_empty_url_disables_download() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[data]\nurl = \"  \"").unwrap();
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.data.source_url(), None);
    }

    #[test]
    fn test_bad_delimiter_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[data]\ndelimiter = \";;\"").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_column_width() {
        assert_eq!(ColumnMap::default().width(), 19);
    }
}
