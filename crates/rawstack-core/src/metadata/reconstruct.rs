use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::consts::{DNG_EXTENSION, TEMP_DNG, TEMP_XMP};
use crate::error::{Result, StackError};
use crate::io::cleanup::{remove_if_exists, remove_rasters};
use crate::stack::{ExposureRecord, StackOperator};
use crate::tools::{Invocation, Tool, Toolchain};

use super::tags::DNG_TAG_RULES;

/// Base name of the stacked output, without extension:
/// `<reference-stem>-stack<count>_<operator>`.
pub fn output_base_name(reference_stem: &str, frame_count: usize, operator: StackOperator) -> String {
    format!("{reference_stem}-stack{frame_count}_{operator}")
}

/// Full file name of the stacked output, e.g. `A-stack3_median.dng`.
pub fn output_file_name(reference_stem: &str, frame_count: usize, operator: StackOperator) -> String {
    format!(
        "{}.{DNG_EXTENSION}",
        output_base_name(reference_stem, frame_count, operator)
    )
}

/// Merged raster renamed to `temp.dng` with the reference frame's metadata
/// copied in. The only way to obtain one is [`rebuild`].
#[derive(Debug)]
pub struct RebuiltDng {
    path: PathBuf,
}

/// A [`RebuiltDng`] whose exposure fields hold the accumulated totals.
#[derive(Debug)]
pub struct ExposedDng {
    path: PathBuf,
}

/// Turn the merged raster into a DNG carrying the reference frame's metadata.
///
/// All tags are copied from `reference`, the raw-IFD calibration tags are
/// remapped into IFD0, and the subfile type is set to a full-resolution image.
pub fn rebuild(toolchain: &Toolchain, merged_raster: &Path, reference: &Path) -> Result<RebuiltDng> {
    let path = toolchain.working_dir().join(TEMP_DNG);
    fs::rename(merged_raster, &path)?;

    info!(reference = %reference.display(), "Rebuilding DNG metadata");
    let invocation = Invocation::new(Tool::ExifTool)
        .args([
            "-n",
            "-IFD0:SubfileType#=0",
            "-overwrite_original",
            "-TagsFromFile",
        ])
        .arg(reference)
        .arg("-all:all>all:all")
        .args(DNG_TAG_RULES.iter().map(|rule| rule.to_arg()))
        .arg(&path);
    toolchain.run_checked(&invocation)?;

    Ok(RebuiltDng { path })
}

impl RebuiltDng {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the reference frame's exposure time and shutter speed with the
    /// accumulated totals.
    pub fn overlay_exposure(self, toolchain: &Toolchain, exposure: &ExposureRecord) -> Result<ExposedDng> {
        info!(
            exposure_time = exposure.exposure_time(),
            frames = exposure.frame_count(),
            "Writing accumulated exposure"
        );
        toolchain.run_checked(
            &Invocation::new(Tool::ExifTool)
                .args(["-n", "-overwrite_original"])
                .arg(format!("-ExposureTime={}", exposure.exposure_time()))
                .arg(format!("-ShutterSpeedValue={}", exposure.shutter_speed()))
                .arg(&self.path),
        )?;
        Ok(ExposedDng { path: self.path })
    }
}

impl ExposedDng {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the file through `dng_validate -dng`, producing
    /// `<output_base>.dng`. On failure the pre-validation file stays on disk.
    pub fn validate(self, toolchain: &Toolchain, output_base: &Path) -> Result<PathBuf> {
        let mut output = output_base.as_os_str().to_os_string();
        output.push(".");
        output.push(DNG_EXTENSION);
        let output = PathBuf::from(output);
        remove_if_exists(&output)?;

        let result = toolchain.run(
            &Invocation::new(Tool::DngValidate)
                .arg("-dng")
                .arg(output_base)
                .arg(&self.path),
        )?;

        if !result.success {
            warn!(kept = %self.path.display(), "Validation failed");
            return Err(StackError::Validation(format!(
                "dng_validate {}: {}; pre-validation file kept at {}",
                result.status_text(),
                result.combined(),
                self.path.display()
            )));
        }
        if !output.is_file() {
            return Err(StackError::Validation(format!(
                "dng_validate did not write {}, pre-validation file kept at {}",
                output.display(),
                self.path.display()
            )));
        }

        remove_if_exists(&self.path)?;
        info!(output = %output.display(), "Stacked DNG written");
        Ok(output)
    }
}

/// Remove the exposure side-record and the per-frame rasters after a
/// successful run.
pub fn finalize(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let side_record = dir.join(TEMP_XMP);
    if remove_if_exists(&side_record)? {
        removed.push(side_record);
    }
    removed.extend(remove_rasters(dir)?);
    Ok(removed)
}
