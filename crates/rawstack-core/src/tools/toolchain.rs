use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::error::{Result, StackError};
use crate::io::RunLog;

use super::{Invocation, ToolOutput, ToolRunner};

/// A [`ToolRunner`] bound to a run log. The working directory is where the
/// pipeline places its own temporaries; tools inherit the caller's directory.
///
/// Every invocation is written to the log before its result is inspected, so
/// the log is complete even when the call that follows aborts the run.
pub struct Toolchain {
    runner: Arc<dyn ToolRunner>,
    working_dir: PathBuf,
    log: RunLog,
}

impl Toolchain {
    pub fn new(runner: Arc<dyn ToolRunner>, working_dir: impl Into<PathBuf>, log: RunLog) -> Self {
        Self {
            runner,
            working_dir: working_dir.into(),
            log,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// Run a tool and return its output whatever the exit status.
    pub fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        match self.runner.run(invocation) {
            Ok(output) => {
                self.log.record(invocation, &output)?;
                Ok(output)
            }
            Err(err) => {
                self.log.record_failure(invocation, &err)?;
                Err(err)
            }
        }
    }

    /// Run a tool and fail with [`StackError::ExternalTool`] on a non-zero exit.
    pub fn run_checked(&self, invocation: &Invocation) -> Result<ToolOutput> {
        let output = self.run(invocation)?;
        if output.success {
            return Ok(output);
        }
        warn!(
            tool = %invocation.tool,
            status = %output.status_text(),
            "External tool failed"
        );
        Err(StackError::ExternalTool {
            tool: invocation.tool.to_string(),
            status: output.status_text(),
            output: output.combined(),
        })
    }
}
