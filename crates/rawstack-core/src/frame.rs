use std::path::{Path, PathBuf};

/// One input exposure, populated progressively as it moves through the pipeline.
///
/// `normalized`, `raster` and `calibration` start out empty and are filled in
/// exactly once by the normalizer and the calibration reader.
#[derive(Clone, Debug)]
pub struct Frame {
    source: PathBuf,
    normalized: Option<NormalizedPaths>,
    calibration: Option<Calibration>,
}

/// Files derived from a frame by normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedPaths {
    /// The frame in the common DNG container.
    pub dng: PathBuf,
    /// Per-frame raster the compositor reads.
    pub raster: PathBuf,
}

/// Sensor calibration and exposure values read from a normalized frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    pub black_level: f64,
    pub white_level: f64,
    /// Exposure time in seconds.
    pub exposure_time: f64,
}

impl Frame {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            normalized: None,
            calibration: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File name without its extension, e.g. `IMG_0001` for `IMG_0001.CR2`.
    pub fn stem(&self) -> String {
        self.source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory the frame lives in. Normalized outputs are written beside it.
    pub fn directory(&self) -> &Path {
        self.source.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Whether the source is already in the DNG container.
    pub fn is_dng(&self) -> bool {
        self.source
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(crate::consts::DNG_EXTENSION))
            .unwrap_or(false)
    }

    pub fn normalized(&self) -> Option<&NormalizedPaths> {
        self.normalized.as_ref()
    }

    pub fn normalized_dng(&self) -> Option<&Path> {
        self.normalized.as_ref().map(|n| n.dng.as_path())
    }

    pub fn raster(&self) -> Option<&Path> {
        self.normalized.as_ref().map(|n| n.raster.as_path())
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub(crate) fn with_normalized(mut self, paths: NormalizedPaths) -> Self {
        debug_assert!(self.normalized.is_none(), "frame normalized twice");
        self.normalized = Some(paths);
        self
    }

    pub(crate) fn with_calibration(mut self, calibration: Calibration) -> Self {
        debug_assert!(self.calibration.is_none(), "calibration read twice");
        self.calibration = Some(calibration);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_only_the_last_extension() {
        let frame = Frame::new("/shots/IMG.0001.CR2");
        assert_eq!(frame.stem(), "IMG.0001");
        assert_eq!(frame.directory(), Path::new("/shots"));
    }

    #[test]
    fn dng_detection_ignores_case() {
        assert!(Frame::new("a.DNG").is_dng());
        assert!(Frame::new("a.dng").is_dng());
        assert!(!Frame::new("a.nef").is_dng());
        assert!(!Frame::new("dng").is_dng());
    }

    #[test]
    fn fresh_frame_has_no_derived_fields() {
        let frame = Frame::new("a.raw");
        assert!(frame.normalized().is_none());
        assert!(frame.raster().is_none());
        assert!(frame.calibration().is_none());
    }
}
