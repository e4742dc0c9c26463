//! Dataset download into a local cache directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, info_span};

use crate::checksum::{archive_digest, check_pinned_digest};
use crate::error::{IngestError, Result};
use crate::extract::extract_archive;

/// Public location of the UCI bank marketing archive.
pub const DEFAULT_DATASET_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/00222/bank.zip";

/// File name the archive is stored under in the cache directory.
pub const DEFAULT_ARCHIVE_NAME: &str = "data.zip";

/// Dataset file inside the archive.
pub const DEFAULT_DATASET_NAME: &str = "bank-full.csv";

/// User agent string for download requests.
const USER_AGENT_VALUE: &str = concat!("bank-insights/", env!("CARGO_PKG_VERSION"));

/// Where the dataset comes from and how it is stored locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    /// Remote ZIP archive.
    pub url: String,
    /// Local file name of the downloaded archive.
    pub archive_name: String,
    /// CSV entry to load from the archive.
    pub dataset_name: String,
    /// Optional pinned SHA256 of the archive.
    pub sha256: Option<String>,
}

impl Default for DatasetSource {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            sha256: None,
        }
    }
}

/// Downloads the archive into `cache_dir`, extracts it there and returns the
/// path of the dataset file.
///
/// Nothing is retried: a network, checksum or extraction failure is returned
/// as is.
pub fn fetch_and_extract(source: &DatasetSource, cache_dir: &Path) -> Result<PathBuf> {
    let span = info_span!("fetch", url = %source.url, cache_dir = %cache_dir.display());
    let _guard = span.enter();

    fs::create_dir_all(cache_dir).map_err(IngestError::io(cache_dir))?;
    let archive_path = cache_dir.join(&source.archive_name);

    let bytes = download(&source.url)?;
    fs::write(&archive_path, &bytes).map_err(IngestError::io(&archive_path))?;
    info!(path = %archive_path.display(), bytes = bytes.len(), "archive downloaded");

    unpack_dataset(source, &archive_path, cache_dir)
}

/// Verifies a local archive against the pinned digest (if any), extracts it
/// into `cache_dir` and returns the path of the dataset entry.
pub fn unpack_dataset(
    source: &DatasetSource,
    archive_path: &Path,
    cache_dir: &Path,
) -> Result<PathBuf> {
    let start = Instant::now();

    let digest = archive_digest(archive_path)?;
    info!(path = %archive_path.display(), sha256 = %digest, "archive digest");
    if let Some(pinned) = &source.sha256 {
        check_pinned_digest(archive_path, pinned, &digest)?;
        debug!("archive matches pinned digest");
    }

    let extracted = extract_archive(archive_path, cache_dir)?;
    let dataset_path = cache_dir.join(&source.dataset_name);
    if !extracted.contains(&dataset_path) {
        return Err(IngestError::MissingEntry {
            archive: archive_path.to_path_buf(),
            entry: source.dataset_name.clone(),
        });
    }

    info!(
        entries = extracted.len(),
        dataset = %dataset_path.display(),
        duration_ms = start.elapsed().as_millis(),
        "archive extracted"
    );
    Ok(dataset_path)
}

/// Fetches `url` and returns the response body.
pub fn download(url: &str) -> Result<Vec<u8>> {
    info!("Starting download from {}", url);

    let network_error = |err: reqwest::Error| IngestError::Network {
        url: url.to_string(),
        message: err.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT_VALUE)
        .build()
        .map_err(network_error)?;
    let response = client
        .get(url)
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .map_err(network_error)?;
    let bytes = response.bytes().map_err(network_error)?;

    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_source_points_at_uci_archive() {
        let source = DatasetSource::default();
        assert_eq!(source.url, DEFAULT_DATASET_URL);
        assert_eq!(source.dataset_name, "bank-full.csv");
        assert!(source.sha256.is_none());
    }

    #[test]
    fn malformed_url_is_a_network_error() {
        let result = download("not a url");
        assert!(matches!(result, Err(IngestError::Network { .. })));
    }
}
