use std::path::Path;

use tracing::debug;

use crate::error::{Result, StackError};
use crate::frame::{Calibration, Frame};
use crate::tools::{Invocation, Tool, Toolchain};

/// exiftool print format yielding `<black> <white> <exposure>`.
///
/// Black and white level are per-channel lists in the raw IFD; only the first
/// entry is kept.
pub const CALIBRATION_FORMAT: &str =
    "${SubIFD:BlackLevel;s/ .*//g} ${SubIFD:WhiteLevel;s/ .*//g} $ExposureTime";

/// Read black level, white level and exposure time from a normalized DNG.
pub fn read_calibration(toolchain: &Toolchain, dng: &Path) -> Result<Calibration> {
    let output = toolchain.run(
        &Invocation::new(Tool::ExifTool)
            .arg("-n")
            .arg("-p")
            .arg(CALIBRATION_FORMAT)
            .arg(dng),
    )?;
    if !output.success {
        return Err(StackError::CalibrationRead {
            frame: dng.to_path_buf(),
            reason: format!("exiftool {}: {}", output.status_text(), output.combined()),
        });
    }
    let calibration = parse_calibration(dng, &output.stdout)?;
    debug!(
        frame = %dng.display(),
        black = calibration.black_level,
        white = calibration.white_level,
        exposure = calibration.exposure_time,
        "Calibration read"
    );
    Ok(calibration)
}

/// Read calibration for an already-normalized frame and attach it.
pub fn calibrate_frame(toolchain: &Toolchain, frame: Frame) -> Result<Frame> {
    let Some(dng) = frame.normalized_dng() else {
        return Err(StackError::CalibrationRead {
            frame: frame.source().to_path_buf(),
            reason: "frame has not been normalized".to_string(),
        });
    };
    let calibration = read_calibration(toolchain, dng)?;
    Ok(frame.with_calibration(calibration))
}

/// Parse the `<black> <white> <exposure>` line printed for [`CALIBRATION_FORMAT`].
pub fn parse_calibration(frame: &Path, text: &str) -> Result<Calibration> {
    let fail = |reason: String| StackError::CalibrationRead {
        frame: frame.to_path_buf(),
        reason,
    };

    let fields: Vec<&str> = text.split_whitespace().collect();
    let [black, white, exposure] = fields.as_slice() else {
        return Err(fail(format!(
            "expected black level, white level and exposure time, got {:?}",
            text.trim()
        )));
    };

    let number = |name: &str, value: &str| -> Result<f64> {
        match value.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(fail(format!("{name} '{value}' is not a valid number"))),
        }
    };
    let black_level = number("black level", black)?;
    let white_level = number("white level", white)?;
    let exposure_time = number("exposure time", exposure)?;

    if white_level <= black_level {
        return Err(fail(format!(
            "white level {white_level} is not above black level {black_level}"
        )));
    }

    Ok(Calibration {
        black_level,
        white_level,
        exposure_time,
    })
}
