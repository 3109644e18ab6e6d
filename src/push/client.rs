// src/push/client.rs
// =============================================================================
// The one HTTP client shared by every push.
//
// reqwest::Client keeps a connection pool internally and is cheap to clone
// (it is an Arc inside), so we build it once in main.rs and hand clones to
// the submitters. Tests build their own and point it at a mock server.
//
// Every call writes exactly one log record:
//   url:<target> message:<response body, or the status code if the body is empty>
// =============================================================================

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use url::Url;

use super::Mode;
use crate::error::PushError;

/// What came back from one HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The URL we sent the request to
    pub endpoint: String,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct PushClient {
    http: Client,
}

impl PushClient {
    /// Builds a client whose every request gives up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, PushError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(concat!("index-pusher/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// POSTs a plain-text body.
    pub async fn post_text(&self, mode: Mode, url: Url, body: String) -> Result<Reply, PushError> {
        let target = url.to_string();
        let request = self.http.post(url).body(body);
        self.send(mode, target, request).await
    }

    pub async fn get(&self, mode: Mode, url: Url) -> Result<Reply, PushError> {
        let target = url.to_string();
        let request = self.http.get(url);
        self.send(mode, target, request).await
    }

    async fn send(
        &self,
        mode: Mode,
        target: String,
        request: RequestBuilder,
    ) -> Result<Reply, PushError> {
        let response = match request.header(CONTENT_TYPE, "text/plain").send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("[{}] url:{} failed: {}", mode, target.trim(), describe(&e));
                return Err(e.into());
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                log::error!("[{}] url:{} status:{} body unreadable: {}", mode, target.trim(), status, e);
                return Err(e.into());
            }
        };

        log::info!("[{}] {}", mode, call_record(&target, status, &body));

        Ok(Reply {
            endpoint: target,
            status,
            body,
        })
    }
}

/// The log line for one answered call: the body, or the status when the body is empty.
fn call_record(target: &str, status: u16, body: &str) -> String {
    let body = body.trim_end();
    if body.is_empty() {
        format!("url:{} message:{}", target.trim(), status)
    } else {
        format!("url:{} message:{}", target.trim(), body)
    }
}

// Short label for a transport failure, for the log file
fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> PushClient {
        PushClient::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_call_record_with_body() {
        assert_eq!(
            call_record(
                " http://data.zz.baidu.com/urls?site=https://a.com&token=t\n",
                200,
                "{\"remain\":9,\"success\":1}\n",
            ),
            r#"url:http://data.zz.baidu.com/urls?site=https://a.com&token=t message:{"remain":9,"success":1}"#
        );
    }

    #[test]
    fn test_call_record_empty_body_gives_status() {
        assert_eq!(
            call_record("https://sp0.baidu.com/s.gif?l=http://foo.com/bar", 204, ""),
            "url:https://sp0.baidu.com/s.gif?l=http://foo.com/bar message:204"
        );
        assert_eq!(call_record("http://h/urls", 500, "  \n"), "url:http://h/urls message:500");
    }

    #[tokio::test]
    async fn test_post_sends_plain_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/urls"))
            .and(query_param("token", "t"))
            .and(header("content-type", "text/plain"))
            .and(body_string("http://a.com/\nhttp://a.com/b\n"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"success":2}"#))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/urls?token=t", server.uri())).unwrap();
        let reply = client()
            .post_text(Mode::Realtime, url, "http://a.com/\nhttp://a.com/b\n".to_string())
            .await
            .unwrap();

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, r#"{"success":2}"#);
        assert!(reply.endpoint.ends_with("/urls?token=t"));
    }

    #[tokio::test]
    async fn test_get_returns_status_for_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/s.gif"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/s.gif?l=http://foo.com/bar", server.uri())).unwrap();
        let reply = client().get(Mode::Js, url).await.unwrap();

        assert_eq!(reply.status, 204);
        assert!(reply.body.is_empty());
    }

    #[tokio::test]
    async fn test_non_2xx_is_still_a_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":400,"message":"empty content"}"#))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/urls", server.uri())).unwrap();
        let reply = client()
            .post_text(Mode::WeekMobile, url, String::new())
            .await
            .unwrap();
        assert_eq!(reply.status, 400);
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let slow = PushClient::new(Duration::from_millis(200)).unwrap();
        let url = Url::parse(&server.uri()).unwrap();
        let err = slow.get(Mode::Js, url).await.unwrap_err();
        match err {
            PushError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
