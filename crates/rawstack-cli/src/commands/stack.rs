use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use console::Term;
use rawstack_core::error::StackError;
use rawstack_core::io::discover_frames;
use rawstack_core::pipeline::run_stack_reported;
use rawstack_core::stack::StackOperator;
use rawstack_core::tools::ProcessRunner;

use crate::progress::BarReporter;
use crate::summary::{print_stack_result, print_stack_summary};

use super::{load_config, resolve_dir};

#[derive(Clone, Copy, ValueEnum)]
pub enum OperatorArg {
    Mean,
    Max,
    Min,
    Median,
}

impl From<OperatorArg> for StackOperator {
    fn from(arg: OperatorArg) -> Self {
        match arg {
            OperatorArg::Mean => StackOperator::Mean,
            OperatorArg::Max => StackOperator::Max,
            OperatorArg::Min => StackOperator::Min,
            OperatorArg::Median => StackOperator::Median,
        }
    }
}

#[derive(Args)]
pub struct StackArgs {
    /// Directory containing the raw files (defaults to the current directory)
    pub dir: Option<PathBuf>,

    /// Pixel-wise statistic used to merge the frames; asks when omitted
    #[arg(short, long, value_enum)]
    pub method: Option<OperatorArg>,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of frames to normalize in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Run log file, relative to the directory
    #[arg(long)]
    pub log: Option<PathBuf>,
}

pub fn run(args: &StackArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.dir.is_some() || args.config.is_none() {
        config.working_dir = resolve_dir(args.dir.as_ref());
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(ref log) = args.log {
        config.log_file = log.clone();
    }

    let frames = discover_frames(&config.working_dir)
        .with_context(|| format!("Failed to scan {}", config.working_dir.display()))?;
    if frames.is_empty() {
        return Err(anyhow::Error::new(StackError::EmptyInput {
            dir: config.working_dir.clone(),
        })
        .context("Place raw files in the directory and try again"));
    }

    config.operator = match args.method {
        Some(method) => method.into(),
        None if args.config.is_some() => config.operator,
        None => prompt_operator()?,
    };

    print_stack_summary(&config, &frames);

    let runner = Arc::new(ProcessRunner::new(config.tools.clone()));
    let reporter = Arc::new(BarReporter::new());
    let output = match run_stack_reported(&config, frames, runner, reporter.clone()) {
        Ok(output) => output,
        Err(err) => {
            reporter.abandon();
            return Err(anyhow::Error::new(err).context(format!(
                "Stacking failed, see {} for tool output",
                config.log_path().display()
            )));
        }
    };

    print_stack_result(&output);
    Ok(())
}

/// Ask for the operator on the terminal until a listed option is entered.
fn prompt_operator() -> Result<StackOperator> {
    require_interactive(std::io::stdin().is_terminal())?;
    let term = Term::stderr();

    for (i, op) in StackOperator::ALL.iter().enumerate() {
        term.write_line(&format!("{} = {}", i + 1, op))?;
    }
    loop {
        term.write_str("Select an option: ")?;
        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            bail!("No operator selected");
        }
        if let Some(op) = parse_menu_choice(&input) {
            term.write_line(&format!("Selected option: {op}"))?;
            return Ok(op);
        }
        term.write_line("Invalid option. Please try again.")?;
    }
}

fn require_interactive(stdin_is_terminal: bool) -> Result<()> {
    if !stdin_is_terminal {
        bail!("No --method given and stdin is not interactive");
    }
    Ok(())
}

fn parse_menu_choice(input: &str) -> Option<StackOperator> {
    let index: usize = input.trim().parse().ok()?;
    StackOperator::ALL.get(index.checked_sub(1)?).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_choices_map_to_operators() {
        assert_eq!(parse_menu_choice("1"), Some(StackOperator::Mean));
        assert_eq!(parse_menu_choice(" 2\n"), Some(StackOperator::Max));
        assert_eq!(parse_menu_choice("3"), Some(StackOperator::Min));
        assert_eq!(parse_menu_choice("4"), Some(StackOperator::Median));
    }

    #[test]
    fn prompt_depends_only_on_stdin() {
        assert!(require_interactive(true).is_ok());
        let err = require_interactive(false).unwrap_err();
        assert!(err.to_string().contains("stdin"));
    }

    #[test]
    fn invalid_menu_choices_are_rejected() {
        assert_eq!(parse_menu_choice("0"), None);
        assert_eq!(parse_menu_choice("5"), None);
        assert_eq!(parse_menu_choice("median"), None);
        assert_eq!(parse_menu_choice(""), None);
    }
}
