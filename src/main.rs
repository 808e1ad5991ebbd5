//! word-walker - Concurrent word-occurrence counter
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use word_walker::config::{CliArgs, Command, ScanConfig};
use word_walker::scan::WordCounter;
use word_walker::server::{self, ServerConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    match args.command {
        Some(Command::Serve {
            root,
            port,
            bind,
            workers,
        }) => run_server(root, &bind, port, workers),
        None => run_scan(&args),
    }
}

/// Run a single scan and print the result
fn run_scan(args: &CliArgs) -> Result<()> {
    let config = ScanConfig::from_args(args).context("Invalid configuration")?;

    let counter = WordCounter::new(config).context("Failed to create counter")?;
    let handle = counter.count().context("Failed to start scan")?;

    // Surface errors as they arrive; the stream closing means the scan
    // has drained and the count is final
    while let Some(err) = handle.next_error() {
        warn!(path = %err.path().display(), "{}", err);
    }

    let summary = handle.finish();

    if !args.quiet {
        println!(
            "Found {} occurrence(s) of '{}' in {} file(s) ({} dir(s), {:.2}s)",
            summary.count,
            counter.word(),
            summary.stats.files_scanned,
            summary.stats.dirs_walked,
            summary.duration.as_secs_f64(),
        );

        if !summary.is_clean() {
            println!("{} path(s) could not be scanned", summary.errors.len());
        }
    }

    Ok(())
}

/// Run the HTTP counting server
fn run_server(root: std::path::PathBuf, bind: &str, port: u16, workers: usize) -> Result<()> {
    let config = ServerConfig {
        corpus_root: root,
        workers,
    };

    // Create tokio runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    runtime
        .block_on(server::serve(config, bind, port))
        .context("Server failed")?;

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("word_walker=debug,warn")
    } else {
        EnvFilter::new("word_walker=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
