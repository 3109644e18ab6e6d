// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands, one per submission mode:
//   index-pusher js          <urls-file>
//   index-pusher realtime    <urls-file> <site> <token> [--action urls|update|del]
//   index-pusher week_mobile <urls-file> <appid> <token> [--action urls] [--type batch]
//
// Global options (concurrency, timeout, log file, endpoints) can also come
// from INDEX_PUSHER_* environment variables.
//
// Rust concepts:
// - Derive macros: clap generates the parser from these structs
// - #[arg(global = true)]: an option accepted before or after the subcommand
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::MAX_URLS_PER_PUSH;
use crate::push::{Action, DEFAULT_API_BASE, DEFAULT_BEACON_URL};

#[derive(Parser, Debug)]
#[command(
    name = "index-pusher",
    version,
    about = "Push URL lists to a search engine's indexing API",
    long_about = "index-pusher reads a file with one URL per line and submits the URLs to the \
                  search engine's push API, several requests at a time. Every request is \
                  recorded in an append-only log file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// How many pushes may be in flight at once
    #[arg(long, global = true, env = "INDEX_PUSHER_CONCURRENCY", default_value_t = 10)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "INDEX_PUSHER_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Log file, appended to on every run
    #[arg(long, global = true, env = "INDEX_PUSHER_LOG_FILE", default_value = "run.log")]
    pub log_file: PathBuf,

    /// Host of the push API
    #[arg(long, global = true, env = "INDEX_PUSHER_API_BASE", default_value = DEFAULT_API_BASE, hide = true)]
    pub api_base: String,

    /// Tracking-pixel endpoint used by `js`
    #[arg(long, global = true, env = "INDEX_PUSHER_BEACON_URL", default_value = DEFAULT_BEACON_URL, hide = true)]
    pub beacon_url: String,

    /// Print the final report as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Also print log records to the terminal
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Push each non-empty line through the JavaScript beacon endpoint
    ///
    /// Example: index-pusher js urls.txt
    Js {
        /// File with one URL per line
        urls: PathBuf,
    },

    /// Instant push for a verified site
    ///
    /// Example: index-pusher realtime urls.txt www.example.com 2f7a... --action update
    Realtime {
        /// File with one URL per line
        urls: PathBuf,

        /// Site as verified on the search platform, e.g. https://www.example.com
        site: String,

        /// Push token issued by the search platform
        token: String,

        /// What to do with the URLs
        #[arg(long, value_enum, default_value_t = Action::Urls)]
        action: Action,

        /// URLs per request (the API accepts at most 2000)
        #[arg(long, default_value_t = MAX_URLS_PER_PUSH)]
        batch_size: usize,
    },

    /// Weekly indexing push for mobile content
    ///
    /// Example: index-pusher week_mobile urls.txt 1581234567 2f7a...
    #[command(name = "week_mobile")]
    WeekMobile {
        /// File with one URL per line
        urls: PathBuf,

        /// Your app id on the search platform
        appid: String,

        /// Push token issued by the search platform
        token: String,

        /// Endpoint path segment
        #[arg(long, default_value = "urls")]
        action: String,

        /// Submission type; weekly indexing uses "batch"
        #[arg(long = "type", default_value = "batch")]
        kind: String,

        /// URLs per request (the API accepts at most 2000)
        #[arg(long, default_value_t = MAX_URLS_PER_PUSH)]
        batch_size: usize,
    },
}
