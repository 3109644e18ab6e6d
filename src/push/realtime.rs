// src/push/realtime.rs
// =============================================================================
// Instant ("realtime") push for a verified site.
//
// Request:
//   POST {api_base}/{action}?site={site}&token={token}
//   Content-Type: text/plain
//   body: the chunk's lines joined as-is (each already ends in '\n')
//
// `site` is the site as registered on the search platform. If it has no
// scheme we assume https://.
// =============================================================================

use async_trait::async_trait;
use clap::ValueEnum;
use serde::Serialize;
use url::Url;

use super::{Mode, PushClient, Reply, Submitter};
use crate::batch::Chunk;
use crate::error::{check_amount, require, PushError, ValidationError};

/// What the service should do with the pushed URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Submit new URLs
    Urls,
    /// Ask for changed URLs to be re-crawled
    Update,
    /// Report URLs as gone
    Del,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Urls => "urls",
            Action::Update => "update",
            Action::Del => "del",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RealtimeSubmitter {
    client: PushClient,
    api_base: String,
    site: String,
    token: String,
    action: Action,
}

impl RealtimeSubmitter {
    /// Fails if `site` or `token` is empty.
    pub fn new(
        client: PushClient,
        api_base: &str,
        site: &str,
        token: &str,
        action: Action,
    ) -> Result<Self, ValidationError> {
        require("site", site)?;
        require("token", token)?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            site: normalize_site(site),
            token: token.trim().to_string(),
            action,
        })
    }

    pub fn endpoint(&self) -> Result<Url, ValidationError> {
        let raw = format!(
            "{}/{}?site={}&token={}",
            self.api_base,
            self.action.as_str(),
            self.site,
            self.token
        );
        Url::parse(&raw).map_err(|e| ValidationError::InvalidEndpoint {
            url: raw,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Submitter for RealtimeSubmitter {
    fn mode(&self) -> Mode {
        Mode::Realtime
    }

    async fn submit(&self, chunk: &Chunk) -> Result<Reply, PushError> {
        check_amount(chunk.len())?;
        let url = self.endpoint()?;

        log::info!("[{}] push {} urls", self.mode(), chunk.len());
        self.client.post_text(self.mode(), url, chunk.body()).await
    }
}

/// Adds `https://` to a site given without a scheme.
pub fn normalize_site(site: &str) -> String {
    let site = site.trim();
    if site.starts_with("https://") || site.starts_with("http://") {
        site.to_string()
    } else {
        format!("https://{}", site)
    }
}
