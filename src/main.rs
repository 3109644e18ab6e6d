// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the run settings, the log file and the shared HTTP client
// 3. Dispatch to the handler for the chosen submission mode
// 4. Print a report and exit with a code describing the worst outcome
//    (see report.rs for the table of codes)
//
// Rust concepts used:
// - async/await: many pushes are in flight at once
// - Result<T, E>: for error handling (anyhow at this level)
// - Generics: one push_file() drives all three submitters
// =============================================================================

mod batch;    // src/batch/ - chunking and concurrent dispatch
mod cli;      // src/cli.rs - command-line parsing
mod config;   // src/config.rs - run settings
mod error;    // src/error.rs - typed errors
mod logging;  // src/logging.rs - run.log setup
mod push;     // src/push/ - talking to the indexing service
mod report;   // src/report.rs - summary and exit codes

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tokio_util::sync::CancellationToken;

use batch::{Chunker, UrlLines};
use cli::{Cli, Commands};
use config::RunConfig;
use error::{check_batch_size, ValidationError};
use push::{BeaconSubmitter, PushClient, RealtimeSubmitter, Submitter, WeekMobileSubmitter};
use report::Summary;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("run aborted: {:#}", e);
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<ValidationError>().is_some() {
                report::EXIT_VALIDATION
            } else {
                report::EXIT_FATAL
            }
        }
    };

    // The file logger writes through; flush anyway before exit() skips destructors
    log::logger().flush();
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32> {
    let config = RunConfig::from_cli(&cli);
    config.validate()?;

    logging::init(&config.log);

    let client = PushClient::new(config.timeout).context("Failed to build HTTP client")?;
    let cancel = watch_ctrl_c();

    match cli.command {
        Commands::Js { urls } => {
            let submitter = BeaconSubmitter::new(client, &config.endpoints.beacon);
            // One URL per request, blank lines skipped
            push_file(&urls, 1, true, &submitter, &config, &cancel).await
        }
        Commands::Realtime { urls, site, token, action, batch_size } => {
            let submitter = RealtimeSubmitter::new(
                client,
                &config.endpoints.api_base,
                &site,
                &token,
                action,
            )?;
            push_file(&urls, batch_size, false, &submitter, &config, &cancel).await
        }
        Commands::WeekMobile { urls, appid, token, action, kind, batch_size } => {
            let submitter = WeekMobileSubmitter::new(
                client,
                &config.endpoints.api_base,
                &appid,
                &token,
                &action,
                &kind,
            )?;
            push_file(&urls, batch_size, false, &submitter, &config, &cancel).await
        }
    }
}

// Reads `path`, pushes it chunk by chunk, prints the report.
// The chunk size is checked before the file is opened, so an oversized
// --batch-size sends nothing at all. The file is closed when the chunk
// iterator is dropped at the end of dispatch.
async fn push_file<S: Submitter>(
    path: &Path,
    chunk_size: usize,
    skip_blank: bool,
    submitter: &S,
    config: &RunConfig,
    cancel: &CancellationToken,
) -> Result<i32> {
    check_batch_size(chunk_size)?;

    let mode = submitter.mode();
    let file = File::open(path)
        .with_context(|| format!("Failed to open URL file {}", path.display()))?;

    let lines = UrlLines::new(BufReader::new(file));
    let lines: Box<dyn Iterator<Item = io::Result<String>>> = if skip_blank {
        Box::new(batch::non_blank(lines))
    } else {
        Box::new(lines)
    };
    let chunks = Chunker::new(lines, chunk_size)?;

    log::info!(
        "[{}] pushing {} in chunks of {} with {} workers",
        mode,
        path.display(),
        chunk_size,
        config.concurrency
    );
    if !config.json {
        println!("🚀 Pushing {} ({} mode, {} at a time)", path.display(), mode, config.concurrency);
    }

    let dispatched = batch::dispatch(chunks, submitter, config.concurrency, cancel).await;
    let mut results = dispatched.results;
    let summary = Summary::from_results(&results);

    report::print_results(&mut results, &summary, config.json)?;
    log::info!(
        "[{}] done: {} chunks, {} accepted, {} rejected, {} invalid, {} transport errors, {} cancelled",
        mode,
        summary.chunks,
        summary.accepted,
        summary.rejected,
        summary.invalid,
        summary.transport_failed,
        summary.cancelled
    );

    if let Some(e) = dispatched.input_error {
        eprintln!("Error: stopped reading {}: {}", path.display(), e);
        if summary.cancelled == 0 {
            return Ok(report::EXIT_FATAL);
        }
    }

    Ok(summary.exit_code())
}

// Cancels the returned token on the first Ctrl-C.
fn watch_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupted, cancelling pending pushes");
            eprintln!("⏹️  Interrupted, cancelling pending pushes...");
            trigger.cancel();
        }
    });

    cancel
}
