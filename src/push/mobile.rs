// src/push/mobile.rs
// =============================================================================
// Weekly-mobile batch push, keyed by an appid instead of a site.
//
//   POST {api_base}/{action}?appid={appid}&token={token}&type={kind}
//
// With the defaults (action "urls", kind "batch") this is the documented
// weekly-indexing endpoint.
// =============================================================================

use async_trait::async_trait;
use url::Url;

use super::{Mode, PushClient, Reply, Submitter};
use crate::batch::Chunk;
use crate::error::{check_amount, require, PushError, ValidationError};

#[derive(Debug, Clone)]
pub struct WeekMobileSubmitter {
    client: PushClient,
    api_base: String,
    appid: String,
    token: String,
    action: String,
    kind: String,
}

impl WeekMobileSubmitter {
    pub fn new(
        client: PushClient,
        api_base: &str,
        appid: &str,
        token: &str,
        action: &str,
        kind: &str,
    ) -> Result<Self, ValidationError> {
        require("appid", appid)?;
        require("token", token)?;
        require("action", action)?;
        require("type", kind)?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            appid: appid.trim().to_string(),
            token: token.trim().to_string(),
            action: action.trim().to_string(),
            kind: kind.trim().to_string(),
        })
    }

    pub fn endpoint(&self) -> Result<Url, ValidationError> {
        let raw = format!(
            "{}/{}?appid={}&token={}&type={}",
            self.api_base, self.action, self.appid, self.token, self.kind
        );
        Url::parse(&raw).map_err(|e| ValidationError::InvalidEndpoint {
            url: raw,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Submitter for WeekMobileSubmitter {
    fn mode(&self) -> Mode {
        Mode::WeekMobile
    }

    async fn submit(&self, chunk: &Chunk) -> Result<Reply, PushError> {
        check_amount(chunk.len())?;
        let url = self.endpoint()?;

        log::info!("[{}] push {} urls", self.mode(), chunk.len());
        self.client.post_text(self.mode(), url, chunk.body()).await
    }
}
