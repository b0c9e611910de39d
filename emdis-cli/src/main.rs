//! emdis - emoji bytecode disassembler
//!
//! Command-line interface for decoding emoji stack programs into
//! x86-style assembly listings.
//!
//! ## Environment Variables
//! - `EMDIS_MAX_STEPS`: step budget per run (default: 100000)
//! - `EMDIS_BRANCH_POLICY`: `enter` or `skip` (default: enter)
//! - `RUST_LOG`: log filter (default: emdis=warn)

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use emdis_core::{
    disassemble, BranchPolicy, DecodeConfig, DecodeReport, JsonListing, Outcome, ProgramLoader,
    TextListing,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "emdis")]
#[command(author = "Emdis Contributors")]
#[command(version = "2026.10.19")]
#[command(about = "Disassemble emoji stack bytecode into x86-style assembly", long_about = None)]
struct Cli {
    /// Program file (whitespace-separated tokens)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Listing format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Policy for conditional blocks on unknown values
    #[arg(short, long, value_enum)]
    branch: Option<BranchArg>,

    /// Maximum dispatched instructions before aborting
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Seed the abstract working stack (bottom first, comma separated)
    #[arg(long, value_name = "VALUES", value_delimiter = ',', allow_hyphen_values = true)]
    stack: Vec<i64>,

    /// Print decode statistics as JSON on stderr
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BranchArg {
    Enter,
    Skip,
}

impl From<BranchArg> for BranchPolicy {
    fn from(arg: BranchArg) -> Self {
        match arg {
            BranchArg::Enter => BranchPolicy::Enter,
            BranchArg::Skip => BranchPolicy::Skip,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            let ending = match report.outcome {
                Outcome::Halted => "halted",
                Outcome::EndOfStream => "end of stream",
            };
            eprintln!(
                "{} {} ({}, {} lines, {} steps)",
                "Finished".green().bold(),
                cli.file.display().to_string().cyan(),
                ending,
                report.lines,
                report.steps
            );

            if cli.stats {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => eprintln!("{}", json),
                    Err(e) => eprintln!("{} {}", "warning:".yellow().bold(), e),
                }
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "emdis=warn,emdis_core=warn",
        1 => "emdis=debug,emdis_core=debug",
        _ => "emdis=trace,emdis_core=trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_config(cli: &Cli) -> DecodeConfig {
    let mut config = DecodeConfig::default().with_stack(cli.stack.iter().copied());

    if let Some(branch) = cli.branch {
        config.branch_policy = branch.into();
    }
    if let Some(max_steps) = cli.max_steps {
        config.max_steps = max_steps;
    }

    config
}

fn run(cli: &Cli) -> Result<DecodeReport> {
    let program = ProgramLoader::load_file(&cli.file)
        .with_context(|| format!("failed to load {}", cli.file.display()))?;
    let config = build_config(cli);

    tracing::info!(
        file = %cli.file.display(),
        tokens = program.len() - 1,
        policy = ?config.branch_policy,
        "loaded program"
    );

    let report = match cli.format {
        OutputFormat::Text => {
            println!("Disassembling ....");
            disassemble(&program, TextListing::new(io::stdout().lock()), &config)
        }
        OutputFormat::Json => disassemble(&program, JsonListing::new(io::stdout().lock()), &config),
    }
    .with_context(|| format!("failed to disassemble {}", cli.file.display()))?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_missing_file_is_usage_error() {
        assert!(Cli::try_parse_from(["emdis"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "emdis",
            "prog.emo",
            "--branch",
            "skip",
            "--max-steps",
            "42",
            "--stack",
            "-1,0,72",
        ])
        .unwrap();

        let config = build_config(&cli);
        assert_eq!(config.branch_policy, BranchPolicy::Skip);
        assert_eq!(config.max_steps, 42);
        assert_eq!(config.initial_stack, vec![-1, 0, 72]);
    }
}
