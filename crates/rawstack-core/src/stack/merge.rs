use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Result, StackError};
use crate::frame::Frame;
use crate::io::cleanup::remove_if_exists;
use crate::tools::{Invocation, Tool, Toolchain};

use super::operator::StackOperator;

/// Per-frame instruction: read the frame's raster and stretch
/// `[black_level, white_level]` to the full output range.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelClause {
    pub raster: PathBuf,
    pub black_level: f64,
    pub white_level: f64,
}

impl LevelClause {
    /// Build the clause for a frame that has been normalized and calibrated.
    pub fn for_frame(frame: &Frame) -> Result<Self> {
        let (Some(raster), Some(calibration)) = (frame.raster(), frame.calibration()) else {
            return Err(StackError::Pipeline(format!(
                "{} was not prepared before building the merge command",
                frame.source().display()
            )));
        };
        Ok(Self {
            raster: raster.to_path_buf(),
            black_level: calibration.black_level,
            white_level: calibration.white_level,
        })
    }

    /// The `-level` argument, e.g. `512,16383`.
    pub fn level_arg(&self) -> String {
        format!("{},{}", self.black_level, self.white_level)
    }

    fn append_to(&self, invocation: Invocation) -> Invocation {
        invocation
            .arg("(")
            .arg(&self.raster)
            .arg("-level")
            .arg(self.level_arg())
            .arg(")")
    }
}

/// Ordered level clauses plus the operator that combines them.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeCommand {
    clauses: Vec<LevelClause>,
    operator: StackOperator,
}

impl MergeCommand {
    pub fn new(operator: StackOperator) -> Self {
        Self {
            clauses: Vec::new(),
            operator,
        }
    }

    pub fn push(&mut self, clause: LevelClause) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[LevelClause] {
        &self.clauses
    }

    pub fn operator(&self) -> StackOperator {
        self.operator
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Compositor call writing the merged raster to `output`:
    /// `( a.tif -level b,w ) ( ... ) -evaluate-sequence <op> <output>`.
    pub fn to_invocation(&self, output: &Path) -> Invocation {
        let invocation = self
            .clauses
            .iter()
            .fold(Invocation::new(Tool::Compositor), |inv, clause| {
                clause.append_to(inv)
            });
        invocation
            .arg("-evaluate-sequence")
            .arg(self.operator.as_str())
            .arg(output)
    }
}

/// Run the compositor once and check that it produced `output`.
///
/// Only the presence of the output file is checked. A non-zero exit that
/// still leaves an output behind is logged as a warning.
pub fn run_merge(toolchain: &Toolchain, command: &MergeCommand, output: &Path) -> Result<()> {
    if command.is_empty() {
        return Err(StackError::MergeExecution(
            "merge command has no frames".to_string(),
        ));
    }
    remove_if_exists(output)?;

    info!(
        frames = command.len(),
        operator = %command.operator(),
        "Merging rasters"
    );
    let result = toolchain.run(&command.to_invocation(output))?;

    if !output.is_file() {
        return Err(StackError::MergeExecution(format!(
            "compositor produced no {} ({}): {}",
            output.display(),
            result.status_text(),
            result.combined()
        )));
    }
    if !result.success {
        warn!(status = %result.status_text(), "Compositor reported an error but wrote output");
    }
    Ok(())
}
