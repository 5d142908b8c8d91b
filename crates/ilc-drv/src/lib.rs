//! Driver crate: CLI parsing, pipeline orchestration, and diagnostic
//! rendering for the `ilc` binary.

pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod output;
pub mod pipeline;

use std::path::{Path, PathBuf};

use ilc_util::Handler;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use cli::Cli;
pub use error::{DriverError, Result};

/// Initializes the global `tracing` subscriber; `--debug` lowers the
/// default filter so `Pipeline`'s phase-transition events are visible.
pub fn init_logging(debug: bool) {
    let filter = if debug { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);
    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}

/// Top-level entry point: dispatches to single-file or `--test-all`
/// compilation and returns whether every compilation succeeded, per
/// spec.md §6's binary exit-code contract.
pub fn run(cli: &Cli) -> bool {
    if cli.test_all {
        run_test_all(cli)
    } else if let Some(input) = &cli.input {
        run_single(cli, input)
    } else {
        eprintln!("error: expected an input file, or --test-all");
        false
    }
}

fn run_single(cli: &Cli, input: &Path) -> bool {
    let handler = Handler::new();
    let outcome = compile_one(cli, input, &handler);
    report(&handler, cli.verbose);
    match outcome {
        Ok(compiled) => {
            if cli.verbose {
                println!("{}: wrote {}", input.display(), compiled.archive_path.display());
                if let Some(report) = &compiled.optimizer_report {
                    println!("{}: optimizer applied {} transformation(s)", input.display(), report.count);
                }
            }
            true
        }
        Err(err) => {
            eprintln!("{}: {}", input.display(), err);
            false
        }
    }
}

fn run_test_all(cli: &Cli) -> bool {
    let test_dir = PathBuf::from("tests");
    let mut entries: Vec<PathBuf> = match std::fs::read_dir(&test_dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
            .collect(),
        Err(err) => {
            eprintln!("error: could not read {}: {}", test_dir.display(), err);
            return false;
        }
    };
    entries.sort();

    let mut all_ok = true;
    for path in &entries {
        if !run_single(cli, path) {
            all_ok = false;
        }
    }
    all_ok
}

fn compile_one(cli: &Cli, input: &Path, handler: &Handler) -> Result<pipeline::CompileOutcome> {
    let out_dir = output::OutputDir::temp()?;
    let pipeline = pipeline::Pipeline { optimize: cli.optimize, debug: cli.debug, handler };
    pipeline.run(input, &out_dir)
}

fn report(handler: &Handler, verbose: bool) {
    for diagnostic in handler.diagnostics() {
        eprintln!("{}", diagnostic.render());
        if verbose {
            for note in &diagnostic.notes {
                eprintln!("  note: {note}");
            }
            for help in &diagnostic.helps {
                eprintln!("  help: {help}");
            }
        }
    }
}
