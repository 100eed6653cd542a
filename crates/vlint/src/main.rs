//! vlint - static linter for synthesizable Verilog
//!
//! Usage: vlint [OPTIONS] <input>

use anyhow::Context;
use clap::{Parser as ClapParser, ValueEnum};
use log::{LevelFilter, info};
use std::fs;
use std::path::PathBuf;
use std::process;
use vlint::{DiagnosticReporter, LintConfig, ReportFormat, SourceContext, lint_source};

/// Violation output format
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Default)]
enum Format {
    /// Numbered report per module on stdout
    #[default]
    Report,
    /// Source-annotated warnings on stderr
    Diagnostics,
}

#[derive(ClapParser, Debug)]
#[command(name = "vlint")]
#[command(version)]
#[command(about = "Static linter for synthesizable Verilog", long_about = None)]
struct Args {
    /// Input Verilog file (.v)
    #[arg(required = true)]
    input: PathBuf,

    /// How to print violations (report or diagnostics)
    #[arg(short, long, value_enum, default_value = "report")]
    format: Format,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dump AST (for debugging)
    #[arg(long)]
    dump_ast: bool,

    /// Dump tokens (for debugging)
    #[arg(long)]
    dump_tokens: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(2);
        }
    }
}

/// Lint the input file; `Ok(true)` when every module is clean
fn run(args: &Args) -> anyhow::Result<bool> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let filename = args.input.display().to_string();

    let mut reporter = DiagnosticReporter::new();
    let file_id = reporter.add_file(&filename, &source);

    let config = LintConfig {
        format: match args.format {
            Format::Report => ReportFormat::Report,
            Format::Diagnostics => ReportFormat::Diagnostics,
        },
        dump_tokens: args.dump_tokens,
        dump_ast: args.dump_ast,
        verbose: args.verbose,
    };

    info!("linting {}", filename);
    let ctx = SourceContext::new(filename.clone(), file_id, &reporter);
    let reports = lint_source(&source, &ctx, &config)?;

    if config.format == ReportFormat::Report {
        for report in &reports {
            println!("{}", report);
        }
    }

    let total: usize = reports.iter().map(|r| r.violations.len()).sum();
    info!("{}: {} violation(s) in {} module(s)", filename, total, reports.len());

    Ok(total == 0)
}
