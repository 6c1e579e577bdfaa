use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No raw files found in {}", dir.display())]
    EmptyInput { dir: PathBuf },

    #[error(
        "{} and {} share the name '{stem}' and would overwrite each other's DNG",
        first.display(),
        second.display()
    )]
    DuplicateStem {
        stem: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Could not read calibration from {}: {reason}", frame.display())]
    CalibrationRead { frame: PathBuf, reason: String },

    #[error("Merge failed: {0}")]
    MergeExecution(String),

    #[error("DNG validation failed: {0}")]
    Validation(String),

    #[error("{tool} exited with {status}: {output}")]
    ExternalTool {
        tool: String,
        status: String,
        output: String,
    },

    #[error("Failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

pub type Result<T> = std::result::Result<T, StackError>;
