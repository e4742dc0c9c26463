//! ZIP extraction into the dataset cache directory.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Extracts every entry of `archive_path` under `dest`.
///
/// Existing files are overwritten, so extracting the same archive twice
/// leaves the same tree. Entries whose names would escape `dest` are
/// rejected. Returns the paths of the extracted files in archive order.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    debug!(archive = %archive_path.display(), "extracting ZIP archive");

    let archive_error = |message: String| IngestError::Archive {
        path: archive_path.to_path_buf(),
        message,
    };

    let file = File::open(archive_path).map_err(IngestError::io(archive_path))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;
    let mut extracted = Vec::with_capacity(archive.len());

    for idx in 0..archive.len() {
        let mut entry = archive
            .by_index(idx)
            .map_err(|e| archive_error(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(archive_error(format!(
                "entry '{}' escapes the destination directory",
                entry.name()
            )));
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(IngestError::io(&target))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(IngestError::io(parent))?;
        }

        let mut output = File::create(&target).map_err(IngestError::io(&target))?;
        let bytes = io::copy(&mut entry, &mut output).map_err(IngestError::io(&target))?;
        debug!(path = %target.display(), bytes, "extracted archive entry");
        extracted.push(target);
    }

    Ok(extracted)
}
