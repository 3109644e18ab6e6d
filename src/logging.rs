// src/logging.rs
// =============================================================================
// Logging setup.
//
// Records go to an append-only log file (run.log by default), one line per
// record: timestamp, level, then "[mode] message". With --verbose they are
// mirrored to the terminal as well.
// =============================================================================

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::LogSettings;

/// Installs the global logger. Safe to call more than once; later calls no-op.
pub fn init(settings: &LogSettings) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    match open_log_file(&settings.path) {
        Ok(file) => loggers.push(WriteLogger::new(LevelFilter::Debug, config.clone(), file)),
        Err(err) => {
            eprintln!(
                "Warning: Could not open log file at {:?}: {}",
                settings.path, err
            );
        }
    }

    if settings.verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Info,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

/// Opens the log file for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        // Keep reqwest/hyper chatter out of the file
        .add_filter_allow_str("index_pusher")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_file_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        writeln!(open_log_file(&path).unwrap(), "first").unwrap();
        writeln!(open_log_file(&path).unwrap(), "second").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("run.log");
        assert!(open_log_file(&path).is_err());
    }
}
