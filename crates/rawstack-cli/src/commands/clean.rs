use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rawstack_core::io::clean_stale_artifacts;

use super::resolve_dir;

#[derive(Args)]
pub struct CleanArgs {
    /// Directory to clean (defaults to the current directory)
    pub dir: Option<PathBuf>,
}

pub fn run(args: &CleanArgs) -> Result<()> {
    let dir = resolve_dir(args.dir.as_ref());
    let removed = clean_stale_artifacts(&dir)
        .with_context(|| format!("Failed to clean {}", dir.display()))?;

    if removed.is_empty() {
        println!("Nothing to clean in {}", dir.display());
    } else {
        for path in &removed {
            println!("Removed {}", path.display());
        }
    }
    Ok(())
}
