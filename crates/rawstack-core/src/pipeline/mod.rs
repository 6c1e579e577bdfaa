pub mod config;
mod helpers;
mod orchestrator;
mod types;

pub use orchestrator::{run_stack, run_stack_reported, stack_directory};
pub use types::{PipelineStage, ProgressReporter, StackOutput};
