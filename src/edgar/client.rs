use async_trait::async_trait;
use log::debug;
use mime::APPLICATION_JSON;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use super::cik::Cik;
use super::submissions::SubmissionsDocument;
use crate::core::config::HarvestConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure or the per-request timeout elapsed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP request failed with status: {status}")]
    Status { status: u16 },
    #[error("response is not a submissions document: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid submissions URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Where submissions documents come from.
#[async_trait]
pub trait SubmissionsSource {
    async fn fetch_submissions(&self, cik: &Cik) -> Result<SubmissionsDocument, FetchError>;
}

/// `GET {data_url}/submissions/CIK##########.json` against EDGAR.
pub struct EdgarClient {
    client: Client,
    data_url: Url,
    user_agent: String,
}

impl EdgarClient {
    pub fn new(config: &HarvestConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            data_url: config.data_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    pub fn submissions_url(&self, cik: &Cik) -> Result<Url, FetchError> {
        let base = self.data_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{}/submissions/CIK{}.json",
            base,
            cik.padded()
        ))?)
    }
}

#[async_trait]
impl SubmissionsSource for EdgarClient {
    async fn fetch_submissions(&self, cik: &Cik) -> Result<SubmissionsDocument, FetchError> {
        let url = self.submissions_url(cik)?;
        debug!("EDGAR API Request URL: {}", url);
        debug!("EDGAR API Headers: User-Agent: {}", self.user_agent);

        let response = self
            .client
            .get(url.as_str())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, APPLICATION_JSON.as_ref())
            .send()
            .await?;

        debug!("Response status: {}", response.status());
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
            });
        }

        let content = response.text().await?;
        debug!("Received content length: {}", content.len());

        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Accept one connection, hand back the raw request head, then answer
    /// with `response` after `delay`.
    async fn serve_once(
        response: &'static str,
        delay: Duration,
    ) -> (Url, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind TCP listener");
        let addr = listener.local_addr().expect("Failed to get local address");
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let _ = tx.send(String::from_utf8_lossy(&request).into_owned());
            tokio::time::sleep(delay).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (Url::parse(&format!("http://{}/", addr)).unwrap(), rx)
    }

    fn local_client(data_url: Url, timeout: Duration) -> EdgarClient {
        let config = HarvestConfig {
            data_url,
            request_timeout: timeout,
            user_agent: "Jane Doe jane@example.com".to_string(),
            ..HarvestConfig::default()
        };
        EdgarClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_non_200_is_status_error() {
        let (url, request) = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            Duration::ZERO,
        )
        .await;
        let client = local_client(url, Duration::from_secs(5));

        let err = client
            .fetch_submissions(&Cik::new("42").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500 }), "{:?}", err);

        let head = request.await.unwrap().to_lowercase();
        assert!(
            head.starts_with("get /submissions/cik0000000042.json http/1.1\r\n"),
            "{}",
            head
        );
        assert!(head.contains("user-agent: jane doe jane@example.com\r\n"), "{}", head);
        assert!(head.contains("accept: application/json\r\n"), "{}", head);
    }

    #[tokio::test]
    async fn test_slow_reply_is_transport_error() {
        let (url, _request) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}",
            Duration::from_millis(1500),
        )
        .await;
        let client = local_client(url, Duration::from_millis(200));

        let err = client
            .fetch_submissions(&Cik::new("42").unwrap())
            .await
            .unwrap_err();
        match err {
            FetchError::Transport(e) => assert!(e.is_timeout(), "{:?}", e),
            other => panic!("expected a transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_document_has_no_recent_table() {
        let (url, _request) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}",
            Duration::ZERO,
        )
        .await;
        let client = local_client(url, Duration::from_secs(5));

        let doc = client
            .fetch_submissions(&Cik::new("42").unwrap())
            .await
            .unwrap();
        assert!(doc.name.is_none());
        assert!(doc.recent().is_none());
    }

    #[test]
    fn test_submissions_url_is_padded() {
        let config = HarvestConfig::default();
        let client = EdgarClient::new(&config).unwrap();
        let url = client.submissions_url(&Cik::new("320193").unwrap()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://data.sec.gov/submissions/CIK0000320193.json"
        );
    }

    #[test]
    fn test_submissions_url_keeps_base_path() {
        let config = HarvestConfig {
            data_url: Url::parse("http://127.0.0.1:8080/edgar/").unwrap(),
            ..HarvestConfig::default()
        };
        let client = EdgarClient::new(&config).unwrap();
        let url = client.submissions_url(&Cik::new("1").unwrap()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/edgar/submissions/CIK0000000001.json"
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status { status: 404 };
        assert_eq!(err.to_string(), "HTTP request failed with status: 404");
    }
}
