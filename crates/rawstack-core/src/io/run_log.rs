use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Result, StackError};
use crate::tools::{Invocation, ToolOutput};

/// Append-only text log shared by every step of a run.
///
/// Writes are serialized behind a mutex so entries from parallel frame tasks
/// never interleave.
pub struct RunLog {
    path: Option<PathBuf>,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl RunLog {
    /// Open (or create) a log file in append mode.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path: Some(path),
            sink: Mutex::new(Box::new(file)),
        })
    }

    /// A log that drops everything written to it.
    pub fn discard() -> Self {
        Self {
            path: None,
            sink: Mutex::new(Box::new(std::io::sink())),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write a free-form line.
    pub fn note(&self, message: &str) -> Result<()> {
        self.write(&format!("{message}\n"))
    }

    /// Record a finished invocation with its exit status and captured streams.
    pub fn record(&self, invocation: &Invocation, output: &ToolOutput) -> Result<()> {
        let mut entry = format!("$ {}\n[{}]\n", invocation.command_line(), output.status_text());
        for stream in [&output.stdout, &output.stderr] {
            if !stream.is_empty() {
                entry.push_str(stream);
                if !stream.ends_with('\n') {
                    entry.push('\n');
                }
            }
        }
        self.write(&entry)
    }

    /// Record an invocation that never produced output, e.g. a missing binary.
    pub fn record_failure(&self, invocation: &Invocation, error: &StackError) -> Result<()> {
        self.write(&format!(
            "$ {}\n[not run] {error}\n",
            invocation.command_line()
        ))
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sink.write_all(text.as_bytes())?;
        sink.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for RunLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunLog").field("path", &self.path).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;

    #[test]
    fn entries_are_appended_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let log = RunLog::open(&path).unwrap();
        log.note("2 raw files found.").unwrap();
        let inv = Invocation::new(Tool::ExifTool).arg("a.dng");
        log.record(&inv, &ToolOutput::ok("512 16383 0.5")).unwrap();
        log.record(&inv, &ToolOutput::failed(1, "Error: bad file\n")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "earlier run\n\
             2 raw files found.\n\
             $ exiftool a.dng\n[exit code 0]\n512 16383 0.5\n\
             $ exiftool a.dng\n[exit code 1]\nError: bad file\n"
        );
    }

    #[test]
    fn discard_accepts_writes() {
        let log = RunLog::discard();
        assert!(log.path().is_none());
        log.note("ignored").unwrap();
    }
}
