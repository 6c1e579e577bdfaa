use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_JOBS, DEFAULT_LOG_FILE};
use crate::error::{Result, StackError};
use crate::stack::StackOperator;
use crate::tools::ToolPaths;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StackConfig {
    /// Directory holding the raw frames. Temporaries, the run log and the
    /// output are written here too.
    pub working_dir: PathBuf,
    pub operator: StackOperator,
    /// Frames normalized concurrently. 1 runs every tool call in sequence.
    pub jobs: usize,
    /// Run log path, relative to `working_dir` unless absolute.
    pub log_file: PathBuf,
    pub tools: ToolPaths,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            operator: StackOperator::default(),
            jobs: DEFAULT_JOBS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            tools: ToolPaths::default(),
        }
    }
}

impl StackConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(StackError::Config("jobs must be at least 1".to_string()));
        }
        if !self.working_dir.is_dir() {
            return Err(StackError::Config(format!(
                "working directory {} does not exist",
                self.working_dir.display()
            )));
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.working_dir.join(&self.log_file)
    }
}
