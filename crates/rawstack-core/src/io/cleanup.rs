use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{RASTER_EXTENSION, TEMP_DNG, TEMP_TIF, TEMP_XMP};
use crate::error::Result;

/// Remove temporary files left behind by a previous run.
///
/// Deletes `temp.dng`, `temp.tif`, `temp.xmp` and every `*.tif` raster in
/// `dir`. Missing files are not an error, so calling this repeatedly is safe.
/// Returns the paths that were actually removed.
pub fn clean_stale_artifacts(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for name in [TEMP_DNG, TEMP_TIF, TEMP_XMP] {
        let path = dir.join(name);
        if remove_if_exists(&path)? {
            removed.push(path);
        }
    }
    removed.extend(remove_rasters(dir)?);
    Ok(removed)
}

/// Remove every `*.tif` file in `dir` (not recursive).
pub fn remove_rasters(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_raster = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(RASTER_EXTENSION))
            .unwrap_or(false);
        if is_raster && remove_if_exists(&path)? {
            removed.push(path);
        }
    }
    removed.sort();
    Ok(removed)
}

/// Delete a file, treating "already gone" as success. Returns whether it existed.
pub(crate) fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Removed");
            Ok(true)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}
