use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use rawstack_core::calibration::read_calibration;
use rawstack_core::io::{discover_frames, RunLog};
use rawstack_core::tools::{ProcessRunner, Toolchain};

use super::{load_config, resolve_dir};

#[derive(Args)]
pub struct InfoArgs {
    /// Directory containing the raw files (defaults to the current directory)
    pub dir: Option<PathBuf>,

    /// Also read black level, white level and exposure time from DNG frames
    #[arg(long)]
    pub calibration: bool,

    /// Config file (TOML), used for tool locations
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let dir = resolve_dir(args.dir.as_ref());
    let frames = discover_frames(&dir)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    println!("Directory:   {}", dir.display());
    println!("Raw files:   {}", frames.len());
    if frames.is_empty() {
        return Ok(());
    }

    let toolchain = if args.calibration {
        let config = load_config(args.config.as_deref())?;
        let runner = Arc::new(ProcessRunner::new(config.tools));
        Some(Toolchain::new(runner, dir.clone(), RunLog::discard()))
    } else {
        None
    };

    println!();
    for (i, frame) in frames.iter().enumerate() {
        let name = frame
            .source()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(ref toolchain) = toolchain else {
            println!("  {:>3}. {}", i + 1, name);
            continue;
        };

        let dng = if frame.is_dng() {
            frame.source().to_path_buf()
        } else {
            frame.directory().join(format!("{}.dng", frame.stem()))
        };
        if !dng.is_file() {
            println!("  {:>3}. {:<28} not yet converted to DNG", i + 1, name);
            continue;
        }
        match read_calibration(toolchain, &dng) {
            Ok(cal) => println!(
                "  {:>3}. {:<28} black {:<8} white {:<8} exposure {} s",
                i + 1,
                name,
                cal.black_level,
                cal.white_level,
                cal.exposure_time
            ),
            Err(err) => println!("  {:>3}. {:<28} {}", i + 1, name, err),
        }
    }

    Ok(())
}
