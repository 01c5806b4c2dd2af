//! HTTP transport
//!
//! The client only needs "GET this URL, give me status and body", so the
//! network sits behind the [`Transport`] trait. [`HttpTransport`] is the
//! reqwest implementation; tests substitute their own.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::Result;

const USER_AGENT: &str = concat!("newznab/", env!("CARGO_PKG_VERSION"));

/// Status and raw body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET. Non-2xx statuses are returned, not raised.
    async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        debug!(
            url = %redact(url),
            status = status,
            num_bytes = body.len(),
            "Indexer response received"
        );

        Ok(HttpResponse { status, body })
    }
}

/// Strip credentials from a URL before it reaches a log line
pub fn redact(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if matches!(k.as_ref(), "apikey" | "r") {
                "***".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    if pairs.is_empty() {
        return redacted;
    }
    redacted.query_pairs_mut().clear().extend_pairs(&pairs);
    redacted
}
