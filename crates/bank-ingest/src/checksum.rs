//! SHA256 digests of downloaded archives.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{IngestError, Result};

/// Streams `path` through SHA256 and returns the lowercase hex digest.
pub fn archive_digest(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(IngestError::io(path))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(IngestError::io(path))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compares an already computed digest against a pinned one.
///
/// The pinned value may carry surrounding whitespace or uppercase hex.
pub fn check_pinned_digest(path: &Path, pinned: &str, actual: &str) -> Result<()> {
    let expected = pinned.trim().to_ascii_lowercase();
    if expected == actual {
        return Ok(());
    }
    Err(IngestError::ChecksumMismatch {
        path: path.to_path_buf(),
        expected,
        actual: actual.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn digest_of_known_contents() {
        let mut file = NamedTempFile::new().unwrap();
        assert_eq!(archive_digest(file.path()).unwrap(), EMPTY_SHA256);
        write!(file, "abc").unwrap();
        file.flush().unwrap();
        assert_eq!(archive_digest(file.path()).unwrap(), ABC_SHA256);
    }

    #[test]
    fn pinned_digest_ignores_case_and_padding() {
        let pinned = format!("  {}\n", ABC_SHA256.to_uppercase());
        assert!(check_pinned_digest(Path::new("data.zip"), &pinned, ABC_SHA256).is_ok());
    }

    #[test]
    fn pinned_digest_mismatch_names_both_values() {
        let err = check_pinned_digest(Path::new("data.zip"), EMPTY_SHA256, ABC_SHA256).unwrap_err();
        match err {
            IngestError::ChecksumMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, EMPTY_SHA256);
                assert_eq!(actual, ABC_SHA256);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = archive_digest(&dir.path().join("absent.zip"));
        assert!(matches!(result, Err(IngestError::Io { .. })));
    }
}
