use std::sync::Arc;

use tracing::info;

use crate::consts::TEMP_TIF;
use crate::error::{Result, StackError};
use crate::frame::Frame;
use crate::io::{check_unique_stems, clean_stale_artifacts, discover_frames, RunLog};
use crate::metadata::{finalize, output_base_name, rebuild};
use crate::stack::{run_merge, ExposureRecord};
use crate::tools::{Toolchain, ToolRunner};

use super::config::StackConfig;
use super::helpers::{build_merge, prepare_frames};
use super::types::{NoOpReporter, PipelineStage, ProgressReporter, StackOutput};

/// Stack `frames` into one DNG with a thread-safe progress reporter.
///
/// The first frame is the reference frame: its metadata seeds the output and
/// its stem names it. Any failure aborts the run without producing an output.
pub fn run_stack_reported(
    config: &StackConfig,
    frames: Vec<Frame>,
    runner: Arc<dyn ToolRunner>,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<StackOutput> {
    if frames.is_empty() {
        return Err(StackError::EmptyInput {
            dir: config.working_dir.clone(),
        });
    }
    check_unique_stems(&frames)?;
    config.validate()?;

    let dir = &config.working_dir;
    let frame_count = frames.len();
    let operator = config.operator;

    reporter.begin_stage(PipelineStage::Cleaning, None);
    let removed = clean_stale_artifacts(dir)?;
    reporter.finish_stage();
    if !removed.is_empty() {
        info!(count = removed.len(), "Removed stale temporary files");
    }

    let log = RunLog::open(config.log_path())?;
    log.note(&format!("{frame_count} raw files found."))?;
    let log_file = log.path().map(|p| p.to_path_buf());
    let toolchain = Toolchain::new(runner, dir.clone(), log);

    info!(frames = frame_count, operator = %operator, jobs = config.jobs, "Stacking");

    let mut exposure = ExposureRecord::new();
    exposure.reset();

    let frames = prepare_frames(&toolchain, frames, config.jobs, &reporter)?;
    let command = build_merge(&frames, operator, &mut exposure)?;

    reporter.begin_stage(PipelineStage::Merging, None);
    let merged = dir.join(TEMP_TIF);
    run_merge(&toolchain, &command, &merged)?;
    reporter.finish_stage();

    let reference = &frames[0];
    let reference_dng = reference.normalized_dng().ok_or_else(|| {
        StackError::Pipeline("reference frame was not normalized".to_string())
    })?;

    reporter.begin_stage(PipelineStage::Reconstructing, None);
    info!(reference = %reference.source().display(), "Creating DNG from reference metadata");
    let rebuilt = rebuild(&toolchain, &merged, reference_dng)?;
    let exposed = rebuilt.overlay_exposure(&toolchain, &exposure)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Validating, None);
    let output_base = dir.join(output_base_name(&reference.stem(), frame_count, operator));
    let artifact = exposed.validate(&toolchain, &output_base)?;
    finalize(dir)?;
    reporter.finish_stage();

    toolchain
        .log()
        .note(&format!("Wrote {}", artifact.display()))?;
    info!(
        output = %artifact.display(),
        total_exposure = exposure.exposure_time(),
        "Stack complete"
    );

    Ok(StackOutput {
        artifact,
        operator,
        frames,
        total_exposure: exposure.exposure_time(),
        log_file,
    })
}

/// Stack `frames` into one DNG.
pub fn run_stack(
    config: &StackConfig,
    frames: Vec<Frame>,
    runner: Arc<dyn ToolRunner>,
) -> Result<StackOutput> {
    run_stack_reported(config, frames, runner, Arc::new(NoOpReporter))
}

/// Discover the raw frames in the configured working directory and stack them.
pub fn stack_directory(
    config: &StackConfig,
    runner: Arc<dyn ToolRunner>,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<StackOutput> {
    let frames = discover_frames(&config.working_dir)?;
    info!(
        dir = %config.working_dir.display(),
        frames = frames.len(),
        "Discovered raw files"
    );
    run_stack_reported(config, frames, runner, reporter)
}
