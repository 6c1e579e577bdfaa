use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rawstack_core::error::Result;
use rawstack_core::frame::Frame;
use rawstack_core::io::RunLog;
use rawstack_core::tools::{Invocation, Tool, ToolOutput, ToolRunner, Toolchain};

/// Stand-in for the external tools.
///
/// Each call is recorded and answered by writing the files the real tool
/// would write, so the pipeline's file checks see a consistent directory.
#[derive(Default)]
pub struct ScriptedRunner {
    calibrations: HashMap<String, String>,
    fail_compositor: bool,
    fail_validation: bool,
    fail_normalize: Option<Tool>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibration reported for the frame with the given stem.
    pub fn with_calibration(self, stem: &str, black: f64, white: f64, exposure: f64) -> Self {
        self.with_calibration_text(stem, &format!("{black} {white} {exposure}\n"))
    }

    /// Raw exiftool output for the frame with the given stem.
    pub fn with_calibration_text(mut self, stem: &str, text: &str) -> Self {
        self.calibrations.insert(stem.to_string(), text.to_string());
        self
    }

    pub fn failing_compositor(mut self) -> Self {
        self.fail_compositor = true;
        self
    }

    pub fn failing_validation(mut self) -> Self {
        self.fail_validation = true;
        self
    }

    /// Fail the per-frame normalization call made to `tool`: the converter,
    /// the exiftool opcode strip, or the `dng_validate -1` raster render.
    pub fn failing_normalize(mut self, tool: Tool) -> Self {
        self.fail_normalize = Some(tool);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, tool: Tool) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|inv| inv.tool == tool)
            .collect()
    }
}

fn stem_of(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl ToolRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        let args = invocation.args_lossy();
        let last = args.last().cloned().unwrap_or_default();
        let has = |needle: &str| args.iter().any(|a| a == needle);

        let fails = self.fail_normalize == Some(invocation.tool);

        let output = match invocation.tool {
            Tool::DngConverter if fails => ToolOutput::failed(2, "Unsupported camera\n"),
            Tool::DngConverter => {
                fs::write(Path::new(&last).with_extension("dng"), "dng")?;
                ToolOutput::ok("1 file converted\n")
            }
            Tool::ExifTool if has("-p") => {
                match self.calibrations.get(&stem_of(&last)) {
                    Some(text) => ToolOutput::ok(text.clone()),
                    None => ToolOutput {
                        code: Some(0),
                        success: true,
                        stdout: String::new(),
                        stderr: "Warning: [minor] Tag 'SubIFD:BlackLevel' not defined\n".into(),
                    },
                }
            }
            Tool::ExifTool if fails && has("-o") => {
                ToolOutput::failed(1, "Error: Not a valid DNG\n")
            }
            Tool::ExifTool => {
                if let Some(pos) = args.iter().position(|a| a == "-o") {
                    fs::copy(&args[pos - 1], &args[pos + 1])?;
                    ToolOutput::ok("    1 image files created\n")
                } else {
                    ToolOutput::ok("    1 image files updated\n")
                }
            }
            Tool::DngValidate if fails && args[0] == "-1" => {
                ToolOutput::failed(1, "*** Error: Unable to render image ***\n")
            }
            Tool::DngValidate if args[0] == "-1" => {
                fs::write(format!("{}.tif", args[1]), "raster")?;
                ToolOutput::ok("Validation complete\n")
            }
            Tool::DngValidate => {
                if self.fail_validation {
                    ToolOutput::failed(1, "*** Error: Invalid DNG file ***\n")
                } else {
                    fs::write(format!("{}.dng", args[1]), "stacked")?;
                    ToolOutput::ok("Validation complete\n")
                }
            }
            Tool::Compositor => {
                if self.fail_compositor {
                    ToolOutput::failed(1, "convert: unable to open image\n")
                } else {
                    fs::write(&last, "merged")?;
                    ToolOutput::ok("")
                }
            }
        };
        Ok(output)
    }
}

/// Create empty raw files in `dir` and return them as frames, in order.
pub fn make_frames(dir: &Path, names: &[&str]) -> Vec<Frame> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, "raw").expect("write raw frame");
            Frame::new(path)
        })
        .collect()
}

/// Runner with calibration for A, B and C (exposures 1.0, 2.0 and 1.5).
pub fn abc_runner() -> ScriptedRunner {
    ScriptedRunner::new()
        .with_calibration("A", 512.0, 16383.0, 1.0)
        .with_calibration("B", 600.0, 16000.0, 2.0)
        .with_calibration("C", 500.0, 15000.0, 1.5)
}

pub fn toolchain(dir: &Path, runner: Arc<ScriptedRunner>) -> Toolchain {
    Toolchain::new(runner, dir, RunLog::discard())
}

/// File names in `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Paths as strings, for comparing against invocation arguments.
pub fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
