use std::path::Path;

use tracing::{debug, info};

use crate::consts::{DNG_EXTENSION, RASTER_EXTENSION, STRIPPED_SUFFIX};
use crate::error::{Result, StackError};
use crate::frame::{Frame, NormalizedPaths};
use crate::io::cleanup::remove_if_exists;
use crate::tools::{Invocation, Tool, Toolchain};

/// Bring a frame into the DNG container and render the raster the compositor reads.
///
/// 1. Non-DNG sources go through the converter (`-u -p0`, uncompressed, no
///    preview), which writes `<stem>.dng` beside the source.
/// 2. A copy with `OpcodeList2`/`OpcodeList3` stripped is written to
///    `<stem>-temp.dng`, so the raster holds unprocessed sensor values.
/// 3. `dng_validate -1 <stem>` renders that copy to `<stem>.tif`; the stripped
///    copy is removed afterwards.
pub fn normalize_frame(toolchain: &Toolchain, frame: Frame) -> Result<Frame> {
    let dir = frame.directory().to_path_buf();
    let stem = frame.stem();
    let dng = if frame.is_dng() {
        frame.source().to_path_buf()
    } else {
        dir.join(format!("{stem}.{DNG_EXTENSION}"))
    };

    if !frame.is_dng() {
        info!(frame = %frame.source().display(), "Converting to DNG");
        toolchain.run_checked(
            &Invocation::new(Tool::DngConverter)
                .args(["-u", "-p0"])
                .arg(frame.source()),
        )?;
        expect_output(Tool::DngConverter, &dng)?;
    }

    let stripped = dir.join(format!("{stem}{STRIPPED_SUFFIX}.{DNG_EXTENSION}"));
    let raster_base = dir.join(&stem);
    let raster = dir.join(format!("{stem}.{RASTER_EXTENSION}"));

    remove_if_exists(&stripped)?;
    toolchain.run_checked(
        &Invocation::new(Tool::ExifTool)
            .args(["-OpcodeList3=", "-OpcodeList2="])
            .arg(&dng)
            .arg("-o")
            .arg(&stripped),
    )?;

    let rendered = toolchain.run_checked(
        &Invocation::new(Tool::DngValidate)
            .arg("-1")
            .arg(&raster_base)
            .arg(&stripped),
    );
    remove_if_exists(&stripped)?;
    rendered?;
    expect_output(Tool::DngValidate, &raster)?;

    debug!(dng = %dng.display(), raster = %raster.display(), "Frame normalized");
    Ok(frame.with_normalized(NormalizedPaths { dng, raster }))
}

fn expect_output(tool: Tool, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StackError::ExternalTool {
            tool: tool.to_string(),
            status: "exit code 0".to_string(),
            output: format!("expected output {} was not written", path.display()),
        })
    }
}
