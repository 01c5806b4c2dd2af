//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use newznab::{ClientConfig, HttpResponse, NewznabClient, NewznabError, Transport};

pub const BASE_URL: &str = "https://indexer.example";
pub const API_KEY: &str = "secret";
pub const USER_ID: i64 = 42;

type Responder = Box<dyn Fn(&Url) -> Result<HttpResponse, NewznabError> + Send + Sync>;

/// Transport that answers from a closure and records every requested URL.
pub struct MockTransport {
    responder: Responder,
    requests: Mutex<Vec<Url>>,
}

impl MockTransport {
    pub fn new(
        responder: impl Fn(&Url) -> Result<HttpResponse, NewznabError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Answer every request with the same 200 body
    pub fn fixed(body: &'static str) -> Arc<Self> {
        Self::new(move |_| Ok(HttpResponse::ok(body)))
    }

    pub fn requests(&self) -> Vec<Url> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Url {
        self.requests().last().cloned().expect("no request was made")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, NewznabError> {
        self.requests.lock().unwrap().push(url.clone());
        (self.responder)(url)
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new(BASE_URL, API_KEY).with_user_id(USER_ID)
}

pub fn client(transport: Arc<MockTransport>) -> NewznabClient {
    client_with(config(), transport)
}

pub fn client_with(config: ClientConfig, transport: Arc<MockTransport>) -> NewznabClient {
    NewznabClient::with_transport(config, transport).unwrap()
}

/// First value of a query parameter
pub fn query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// An RSS page of `count` items with GUIDs `guid-<start>` onwards
pub fn rss_page(start: usize, count: usize) -> String {
    let items: String = (start..start + count)
        .map(|i| {
            format!(
                r#"<item>
  <title>Release {i}</title>
  <guid>guid-{i}</guid>
  <pubDate>Sat, 18 Jan 2025 14:30:00 +0000</pubDate>
  <enclosure url="https://indexer.example/getnzb/guid-{i}.nzb" length="1000" type="application/x-nzb"/>
  <newznab:attr name="guid" value="guid-{i}"/>
  <newznab:attr name="category" value="5040"/>
</item>"#
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:newznab="http://www.newznab.com/DTD/2010/feeds/attributes/">
<channel><title>indexer</title>{items}</channel>
</rss>"#
    )
}
