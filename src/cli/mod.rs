//! Command-line interface for autocut.
//!
//! One invocation processes one path, either a single `.rec` directory or a
//! series directory with many recordings, and exits with:
//! - `0`: every recording was committed or skipped
//! - `1`: the run was aborted (config, lock or missing tool)
//! - `2`: at least one recording failed, the others were still processed

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::adapters::Toolset;
use crate::config::Config;
use crate::core::{Orchestrator, RunLock};
use crate::domain::{Outcome, RunSummary};

/// Exit status when some recordings failed
pub const EXIT_PARTIAL_FAILURE: u8 = 2;

/// autocut - Automatic markad cutter for VDR recordings
///
/// Replaces the original .ts files with the cut .ts file. Be careful, you
/// might lose data!
#[derive(Parser, Debug)]
#[command(name = "autocut")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Recording directory, or a series directory containing `*/*.rec`
    pub path: PathBuf,

    /// Config file (defaults to ~/.config/autocut/config.yaml)
    #[arg(short, long, env = "AUTOCUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only report which recordings would be processed
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<ExitCode> {
        let config = Config::load(self.config.as_deref())?;

        // A dry run touches nothing, so it may overlap a real run
        let _lock = if self.dry_run {
            None
        } else {
            Some(RunLock::acquire(&config.lock_path())?)
        };

        let orchestrator = Orchestrator::new(Toolset::from_config(&config.tools), config.policy)
            .with_dry_run(self.dry_run);
        let summary = orchestrator.run(&self.path).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize run summary")?;
            println!("{}", json);
        } else {
            print_summary(&summary);
        }

        Ok(ExitCode::from(exit_status(&summary)))
    }
}

/// Exit status for a run that was not aborted
pub fn exit_status(summary: &RunSummary) -> u8 {
    if summary.failed() > 0 {
        EXIT_PARTIAL_FAILURE
    } else {
        0
    }
}

fn print_summary(summary: &RunSummary) {
    for candidate in &summary.candidates {
        let detail = match &candidate.outcome {
            Outcome::Committed {
                check: Some(check), ..
            } => format!("committed  (kept {:.1}%)", check.ratio * 100.0),
            Outcome::Committed { .. } => "committed  (resumed)".to_string(),
            Outcome::Skipped { reason } => format!("skipped    ({})", reason),
            Outcome::Failed { error } => format!("FAILED     ({})", error),
            Outcome::Eligible => "eligible".to_string(),
        };
        println!("{}  {}", detail, candidate.recording.display());
    }

    println!(
        "\n{} committed, {} skipped, {} failed, {} eligible",
        summary.committed(),
        summary.skipped(),
        summary.failed(),
        summary.eligible()
    );
}
