//! Fetching the registry table when it is not on disk.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use super::source::read_archive_member;
use crate::config::DataConfig;
use crate::error::{Error, Result};

const USER_AGENT: &str = concat!("adreszoeker/", env!("CARGO_PKG_VERSION"));

/// Attempts per download, including the first.
const MAX_RETRIES: u32 = 3;

/// Backoff before the second attempt; doubles after that.
const RETRY_BASE_DELAY_MS: u64 = 500;

pub fn create_client(timeout_secs: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Response body of `url`. Server errors and connection failures are
/// retried with exponential backoff; client errors are returned at once.
pub fn download_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let mut last_error: Option<String> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = RETRY_BASE_DELAY_MS * (1 << (attempt - 1));
            debug!(attempt, delay_ms = delay, "Retrying after delay");
            thread::sleep(Duration::from_millis(delay));
        }

        match client.get(url).send() {
            Ok(response) => {
                let status = response.status();
                if status.is_server_error() {
                    warn!(
                        status = %status,
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        "Server error, will retry"
                    );
                    last_error = Some(format!("server error: {status}"));
                    continue;
                }

                let response = response.error_for_status()?;
                return Ok(response.bytes()?.to_vec());
            }
            Err(e) if e.is_connect() || e.is_timeout() => {
                warn!(
                    error = %e,
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "Connection error, will retry"
                );
                last_error = Some(e.to_string());
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(Error::DownloadFailed {
        url: url.to_string(),
        attempts: MAX_RETRIES,
        message: last_error.unwrap_or_else(|| "unknown error".to_string()),
    })
}

/// Write downloaded bytes to `target`. When `url` names a zip archive the
/// member called like `target` is extracted instead.
pub fn store_source(bytes: &[u8], url: &str, target: &Path) -> Result<()> {
    let content = if url.to_ascii_lowercase().ends_with(".zip") {
        let member = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        read_archive_member(Cursor::new(bytes), &member)?
    } else {
        bytes.to_vec()
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, &content)?;
    info!("Stored {} bytes at {}", content.len(), target.display());
    Ok(())
}

/// Download `url` into the configured registry file
pub fn fetch_source(data: &DataConfig, url: &str) -> Result<()> {
    info!("Downloading {}", url);
    let client = create_client(data.http_timeout_secs)?;
    let bytes = download_bytes(&client, url)?;
    store_source(&bytes, url, &data.registry_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zipped(name: &str, content: &[u8]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_create_client() {
        assert!(create_client(5).is_ok());
    }

    #[test]
    fn test_store_extracts_zip_member() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bag").join("postcode_NL.csv");
        let bytes = zipped("postcode_NL.csv", b"2511BT;1;29;ODD;Spui");

        store_source(&bytes, "http://example.org/postcode_NL.csv.ZIP", &target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"2511BT;1;29;ODD;Spui");
    }

    #[test]
    fn test_store_plain_body() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("postcode_NL.csv");

        store_source(b"3526KB;Simplonbaan", "http://example.org/postcode_NL.csv", &target).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "3526KB;Simplonbaan");
    }

    #[test]
    fn test_store_wrong_member_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("postcode_NL.csv");
        let bytes = zipped("other.csv", b"x");

        let err = store_source(&bytes, "http://example.org/data.zip", &target).unwrap_err();
        assert!(matches!(err, Error::MissingMember(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_invalid_url_not_retried() {
        let client = create_client(5).unwrap();
        let err = download_bytes(&client, "not a url").unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
