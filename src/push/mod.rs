// src/push/mod.rs
// =============================================================================
// This module contains everything that talks to the indexing service.
//
// Submodules:
// - client: the shared HTTP client (one per process, cloned into submitters)
// - realtime: instant push (POST a batch of URLs for a verified site)
// - mobile: weekly-mobile batch push (POST a batch of URLs for an appid)
// - beacon: JS-beacon push (GET one URL at a time to a tracking pixel)
// - receipt: best-effort decoding of the service's JSON answer
//
// Each mode implements the same Submitter trait, so the dispatcher does not
// care which one it is driving.
//
// Rust concepts:
// - Traits: a shared capability ("submit a chunk") with one impl per mode
// - async-trait: lets a trait have async methods behind a trait object
// - Enums with data: Outcome carries different details per case
// =============================================================================

mod beacon;
mod client;
mod mobile;
mod realtime;
mod receipt;

pub use beacon::BeaconSubmitter;
pub use client::{PushClient, Reply};
pub use mobile::WeekMobileSubmitter;
pub use realtime::{Action, RealtimeSubmitter};
pub use receipt::Receipt;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::batch::Chunk;
use crate::error::PushError;

/// Default host of the push API.
pub const DEFAULT_API_BASE: &str = "http://data.zz.baidu.com";

/// Default tracking-pixel endpoint used by the JS-beacon mode.
pub const DEFAULT_BEACON_URL: &str = "https://sp0.baidu.com/9_Q4simg2RQJ8t7jm9iCKT-xh_/s.gif";

/// Where requests are sent. Overridable so tests can point at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub beacon: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            beacon: DEFAULT_BEACON_URL.to_string(),
        }
    }
}

/// The three submission modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Js,
    Realtime,
    WeekMobile,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Js => "js",
            Mode::Realtime => "realtime",
            Mode::WeekMobile => "week_mobile",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pushes one chunk with exactly one HTTP call.
///
/// Implementations must validate the chunk first and return a
/// [`PushError::Validation`] without touching the network when it is invalid.
#[async_trait]
pub trait Submitter: Send + Sync {
    fn mode(&self) -> Mode;

    async fn submit(&self, chunk: &Chunk) -> Result<Reply, PushError>;
}

/// What happened to one chunk.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// 2xx and the service did not report an error
    Accepted {
        status: u16,
        body: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        receipt: Option<Receipt>,
    },
    /// Non-2xx, or a 2xx whose JSON carries an error code
    Rejected {
        status: u16,
        body: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        receipt: Option<Receipt>,
    },
    /// Failed validation, nothing was sent
    Invalid { reason: String },
    /// The request never got a full answer
    TransportFailed { reason: String },
    /// Stopped by Ctrl-C before it finished
    Cancelled,
}

/// The result of pushing one chunk.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    pub index: usize,
    pub mode: Mode,
    pub url_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl SubmissionResult {
    /// Turns a submitter's answer into a result, logging failures.
    pub fn from_attempt(mode: Mode, chunk: &Chunk, attempt: Result<Reply, PushError>) -> Self {
        let (endpoint, outcome) = match attempt {
            Ok(reply) => {
                let receipt = Receipt::parse(&reply.body);
                let service_error = receipt.as_ref().is_some_and(|r| r.error.is_some());
                let outcome = if (200..300).contains(&reply.status) && !service_error {
                    Outcome::Accepted {
                        status: reply.status,
                        body: reply.body,
                        receipt,
                    }
                } else {
                    Outcome::Rejected {
                        status: reply.status,
                        body: reply.body,
                        receipt,
                    }
                };
                (Some(reply.endpoint), outcome)
            }
            Err(PushError::Validation(e)) => {
                log::warn!("[{}] chunk {} not sent: {}", mode, chunk.index, e);
                (None, Outcome::Invalid { reason: e.to_string() })
            }
            Err(PushError::Transport(e)) => {
                let endpoint = e.url().map(|u| u.to_string());
                (endpoint, Outcome::TransportFailed { reason: e.to_string() })
            }
        };

        Self {
            index: chunk.index,
            mode,
            url_count: chunk.len(),
            endpoint,
            outcome,
        }
    }

    pub fn cancelled(mode: Mode, chunk: &Chunk) -> Self {
        Self {
            index: chunk.index,
            mode,
            url_count: chunk.len(),
            endpoint: None,
            outcome: Outcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn chunk() -> Chunk {
        Chunk::new(3, vec!["http://a.com/\n".into(), "http://a.com/b\n".into()])
    }

    fn reply(status: u16, body: &str) -> Reply {
        Reply {
            endpoint: "http://data.zz.baidu.com/urls?site=https://a.com&token=t".into(),
            status,
            body: body.into(),
        }
    }

    #[test]
    fn test_accepted_reply() {
        let result = SubmissionResult::from_attempt(
            Mode::Realtime,
            &chunk(),
            Ok(reply(200, r#"{"remain":4999998,"success":2}"#)),
        );
        assert_eq!(result.index, 3);
        assert_eq!(result.url_count, 2);
        match result.outcome {
            Outcome::Accepted { receipt, .. } => {
                assert_eq!(receipt.unwrap().success, Some(2));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_error_code_in_2xx_body_is_rejected() {
        let result = SubmissionResult::from_attempt(
            Mode::Realtime,
            &chunk(),
            Ok(reply(200, r#"{"error":401,"message":"token is not valid"}"#)),
        );
        assert!(matches!(result.outcome, Outcome::Rejected { status: 200, .. }));
    }

    #[test]
    fn test_non_2xx_is_rejected() {
        let result =
            SubmissionResult::from_attempt(Mode::WeekMobile, &chunk(), Ok(reply(400, "")));
        assert!(matches!(result.outcome, Outcome::Rejected { status: 400, .. }));
    }

    #[test]
    fn test_validation_error_has_no_endpoint() {
        let err = PushError::Validation(ValidationError::MissingCredential("token"));
        let result = SubmissionResult::from_attempt(Mode::Realtime, &chunk(), Err(err));
        assert!(result.endpoint.is_none());
        assert!(matches!(result.outcome, Outcome::Invalid { .. }));
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = SubmissionResult::cancelled(Mode::Js, &chunk());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "cancelled");
        assert_eq!(json["mode"], "js");
        assert_eq!(json["index"], 3);
        assert!(json.get("endpoint").is_none());
    }
}
