mod toolchain;

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_COMPOSITOR, DEFAULT_DNG_CONVERTER, DEFAULT_DNG_VALIDATE, DEFAULT_EXIFTOOL};
use crate::error::{Result, StackError};

pub use toolchain::Toolchain;

/// External programs the pipeline drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    /// Raw-to-DNG converter.
    DngConverter,
    /// Metadata reader/writer.
    ExifTool,
    /// DNG SDK validator, also used to render per-frame rasters.
    DngValidate,
    /// Pixel compositor.
    Compositor,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DngConverter => write!(f, "dng-converter"),
            Self::ExifTool => write!(f, "exiftool"),
            Self::DngValidate => write!(f, "dng_validate"),
            Self::Compositor => write!(f, "compositor"),
        }
    }
}

/// Executable locations for each [`Tool`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolPaths {
    pub dng_converter: PathBuf,
    pub exiftool: PathBuf,
    pub dng_validate: PathBuf,
    pub compositor: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            dng_converter: PathBuf::from(DEFAULT_DNG_CONVERTER),
            exiftool: PathBuf::from(DEFAULT_EXIFTOOL),
            dng_validate: PathBuf::from(DEFAULT_DNG_VALIDATE),
            compositor: PathBuf::from(DEFAULT_COMPOSITOR),
        }
    }
}

impl ToolPaths {
    pub fn program(&self, tool: Tool) -> &Path {
        match tool {
            Tool::DngConverter => &self.dng_converter,
            Tool::ExifTool => &self.exiftool,
            Tool::DngValidate => &self.dng_validate,
            Tool::Compositor => &self.compositor,
        }
    }
}

/// A single external tool call: which tool and its argument list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(tool: Tool) -> Self {
        Self {
            tool,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Arguments as lossy UTF-8 strings, convenient for matching and logging.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Human-readable command line for the run log.
    pub fn command_line(&self) -> String {
        let mut line = self.tool.to_string();
        for arg in self.args_lossy() {
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push('\'');
                line.push_str(&arg);
                line.push('\'');
            } else {
                line.push_str(&arg);
            }
        }
        line
    }
}

/// Captured result of a finished tool process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "signal".to_string(),
        }
    }

    /// Stdout and stderr joined, trimmed, for error messages.
    pub fn combined(&self) -> String {
        let out = self.stdout.trim();
        let err = self.stderr.trim();
        match (out.is_empty(), err.is_empty()) {
            (true, true) => String::new(),
            (false, true) => out.to_string(),
            (true, false) => err.to_string(),
            (false, false) => format!("{out}\n{err}"),
        }
    }
}

/// Runs external tools. The pipeline only ever talks to tools through this trait.
///
/// Path arguments are already resolved against the caller's directory, so a
/// runner must not change directory before spawning.
pub trait ToolRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput>;
}

/// Spawns real processes and captures their output.
pub struct ProcessRunner {
    paths: ToolPaths,
}

impl ProcessRunner {
    pub fn new(paths: ToolPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ToolPaths {
        &self.paths
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        let program = self.paths.program(invocation.tool);
        debug!(tool = %invocation.tool, program = %program.display(), "Spawning");

        let output = Command::new(program)
            .args(&invocation.args)
            .output()
            .map_err(|source| StackError::ToolLaunch {
                tool: invocation.tool.to_string(),
                source,
            })?;

        Ok(ToolOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
