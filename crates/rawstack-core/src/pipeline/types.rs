use std::path::PathBuf;

use crate::frame::Frame;
use crate::stack::StackOperator;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Cleaning,
    Normalizing,
    Merging,
    Reconstructing,
    Validating,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cleaning => write!(f, "Cleaning up"),
            Self::Normalizing => write!(f, "Normalizing frames"),
            Self::Merging => write!(f, "Merging"),
            Self::Reconstructing => write!(f, "Rebuilding metadata"),
            Self::Validating => write!(f, "Validating"),
        }
    }
}

/// Result of a successful stacking run.
#[derive(Clone, Debug)]
pub struct StackOutput {
    /// The validated stacked DNG.
    pub artifact: PathBuf,
    pub operator: StackOperator,
    /// Frames in processing order; the first is the reference frame.
    pub frames: Vec<Frame>,
    /// Accumulated exposure time written into the output, in seconds.
    pub total_exposure: f64,
    pub log_file: Option<PathBuf>,
}

impl StackOutput {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_stack` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
