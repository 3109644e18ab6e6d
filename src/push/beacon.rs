// src/push/beacon.rs
// =============================================================================
// JS-beacon push: the same request the search engine's auto-push snippet makes
// from a browser. One URL per call, no credentials, no batch cap.
//
//   GET {beacon}?l={url}
// =============================================================================

use async_trait::async_trait;
use url::Url;

use super::{Mode, PushClient, Reply, Submitter};
use crate::batch::Chunk;
use crate::error::{PushError, ValidationError};

#[derive(Debug, Clone)]
pub struct BeaconSubmitter {
    client: PushClient,
    beacon: String,
}

impl BeaconSubmitter {
    pub fn new(client: PushClient, beacon: &str) -> Self {
        Self {
            client,
            beacon: beacon.trim().to_string(),
        }
    }

    /// The full GET target for one page URL.
    pub fn target(&self, page_url: &str) -> Result<Url, ValidationError> {
        let raw = format!("{}?l={}", self.beacon, page_url.trim());
        Url::parse(&raw).map_err(|e| ValidationError::InvalidEndpoint {
            url: raw,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Submitter for BeaconSubmitter {
    fn mode(&self) -> Mode {
        Mode::Js
    }

    async fn submit(&self, chunk: &Chunk) -> Result<Reply, PushError> {
        let page_url = match chunk.lines.as_slice() {
            [only] => only,
            other => return Err(ValidationError::BeaconNeedsOneUrl(other.len()).into()),
        };
        let url = self.target(page_url)?;
        self.client.get(self.mode(), url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::DEFAULT_BEACON_URL;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> PushClient {
        PushClient::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_target_embeds_url() {
        let submitter = BeaconSubmitter::new(client(), DEFAULT_BEACON_URL);
        assert_eq!(
            submitter.target("http://foo.com/bar\n").unwrap().as_str(),
            "https://sp0.baidu.com/9_Q4simg2RQJ8t7jm9iCKT-xh_/s.gif?l=http://foo.com/bar"
        );
    }

    #[tokio::test]
    async fn test_submit_gets_beacon() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/s.gif"))
            .and(query_param("l", "http://foo.com/bar"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let submitter = BeaconSubmitter::new(client(), &format!("{}/s.gif", server.uri()));
        let reply = submitter
            .submit(&Chunk::new(0, vec!["  http://foo.com/bar \r\n".into()]))
            .await
            .unwrap();
        assert_eq!(reply.status, 200);
    }

    #[tokio::test]
    async fn test_more_than_one_url_rejected() {
        let submitter = BeaconSubmitter::new(client(), DEFAULT_BEACON_URL);
        let chunk = Chunk::new(0, vec!["http://a.com\n".into(), "http://b.com\n".into()]);
        let err = submitter.submit(&chunk).await.unwrap_err();
        assert!(matches!(
            err,
            PushError::Validation(ValidationError::BeaconNeedsOneUrl(2))
        ));
    }
}
