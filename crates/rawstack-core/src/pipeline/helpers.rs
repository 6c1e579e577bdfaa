use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::calibration::calibrate_frame;
use crate::error::{Result, StackError};
use crate::frame::Frame;
use crate::normalize::normalize_frame;
use crate::stack::{ExposureRecord, LevelClause, MergeCommand, StackOperator};
use crate::tools::Toolchain;

use super::types::{PipelineStage, ProgressReporter};

/// Normalize one frame and read its calibration.
pub(super) fn prepare_frame(toolchain: &Toolchain, frame: Frame) -> Result<Frame> {
    let frame = normalize_frame(toolchain, frame)?;
    calibrate_frame(toolchain, frame)
}

/// Prepare every frame, at most `jobs` at a time, returning them in input order.
///
/// The first failure aborts the whole batch.
pub(super) fn prepare_frames(
    toolchain: &Toolchain,
    frames: Vec<Frame>,
    jobs: usize,
    reporter: &Arc<dyn ProgressReporter>,
) -> Result<Vec<Frame>> {
    let frame_count = frames.len();
    reporter.begin_stage(PipelineStage::Normalizing, Some(frame_count));

    let prepared = if jobs <= 1 || frame_count <= 1 {
        let mut prepared = Vec::with_capacity(frame_count);
        for (i, frame) in frames.into_iter().enumerate() {
            prepared.push(prepare_frame(toolchain, frame)?);
            reporter.advance(i + 1);
        }
        prepared
    } else {
        debug!(jobs, frames = frame_count, "Preparing frames in parallel");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| StackError::Config(format!("cannot start worker pool: {e}")))?;
        let done = AtomicUsize::new(0);
        pool.install(|| {
            frames
                .into_par_iter()
                .map(|frame| -> Result<Frame> {
                    let frame = prepare_frame(toolchain, frame)?;
                    reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
                    Ok(frame)
                })
                .collect::<Result<Vec<_>>>()
        })?
    };

    reporter.finish_stage();
    Ok(prepared)
}

/// Walk the prepared frames in order, appending one level clause and one
/// exposure increment per frame.
pub(super) fn build_merge(
    frames: &[Frame],
    operator: StackOperator,
    exposure: &mut ExposureRecord,
) -> Result<MergeCommand> {
    let mut command = MergeCommand::new(operator);
    for frame in frames {
        command.push(LevelClause::for_frame(frame)?);
        let calibration = frame.calibration().ok_or_else(|| {
            StackError::Pipeline(format!(
                "{} has no calibration",
                frame.source().display()
            ))
        })?;
        exposure.accumulate(calibration.exposure_time);
    }
    Ok(command)
}
