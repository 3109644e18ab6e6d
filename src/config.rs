// src/config.rs
// =============================================================================
// Run settings, gathered once from the parsed command line.
//
// Everything a push needs besides the subcommand's own arguments lives here,
// so main.rs can build the HTTP client, the logger and the dispatcher from
// one value.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::ValidationError;
use crate::push::Endpoints;

/// Where and how loudly to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub path: PathBuf,
    /// Mirror records to the terminal too
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub concurrency: usize,
    pub timeout: Duration,
    pub log: LogSettings,
    pub endpoints: Endpoints,
    pub json: bool,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            concurrency: cli.concurrency,
            timeout: Duration::from_secs(cli.timeout),
            log: LogSettings {
                path: cli.log_file.clone(),
                verbose: cli.verbose,
            },
            endpoints: Endpoints {
                api_base: cli.api_base.clone(),
                beacon: cli.beacon_url.clone(),
            },
            json: cli.json,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.concurrency == 0 {
            return Err(ValidationError::InvalidConfig(
                "--concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ValidationError::InvalidConfig(
                "--timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}
