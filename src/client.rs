//! Indexer client
//!
//! [`NewznabClient`] ties the pieces together: build a request, fetch it
//! through a [`Transport`], decode the body and normalize the items.
//!
//! Every operation is a single round trip except
//! [`NewznabClient::load_rss_until_marker`], which walks RSS pages in offset
//! order until it reaches a GUID the caller has already seen.

use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{NewznabError, Result};
use crate::feed::{self, date};
use crate::normalize::{Source, normalize};
use crate::request::{ApiRequest, RequestBuilder};
use crate::transport::{HttpTransport, Transport, redact};
use crate::types::{Capabilities, Comment, SearchRecord, SearchType, TvId};

/// Client for one Newznab/Torznab indexer.
///
/// Holds only immutable configuration and a shared transport, so it can be
/// cloned or wrapped in an `Arc` and used from several tasks at once.
#[derive(Clone)]
pub struct NewznabClient {
    config: ClientConfig,
    requests: RequestBuilder,
    source: Source,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for NewznabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewznabClient")
            .field("base_url", &self.config.base_url)
            .field("user_id", &self.config.user_id)
            .field("extended_attributes", &self.config.extended_attributes)
            .finish()
    }
}

impl NewznabClient {
    /// Create a client backed by reqwest
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client with a caller-supplied transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        let requests = RequestBuilder::new(
            config.api_key.clone(),
            config.user_id,
            config.extended_attributes,
        );
        let source = Source::new(config.base_url.clone(), config.api_key.clone());

        info!(
            base_url = %config.base_url,
            extended = config.extended_attributes,
            insecure = config.insecure_skip_verify,
            "Created Newznab client"
        );

        Ok(Self {
            config,
            requests,
            source,
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The request builder used by this client, for callers composing their
    /// own [`ApiRequest`]s
    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    /// Run one search request and normalize the results in feed order.
    ///
    /// A non-zero error code in the response wins over any items it carries.
    pub async fn search(&self, request: &ApiRequest) -> Result<Vec<SearchRecord>> {
        let body = self.fetch(request).await?;
        let feed = feed::decode_feed(&body)?;

        if let Some(error) = feed.error {
            warn!(
                code = error.code,
                description = %error.description,
                "Indexer returned an error"
            );
            return Err(error.into());
        }

        let records: Vec<SearchRecord> = feed
            .items
            .iter()
            .map(|item| normalize(item, &self.source))
            .collect();

        debug!(
            t = request.get("t").unwrap_or_default(),
            releases_found = records.len(),
            total = ?feed.channel.total,
            "Newznab search complete"
        );

        Ok(records)
    }

    pub async fn search_with_tvrage(
        &self,
        categories: &[i32],
        rage_id: i64,
        season: i32,
        episode: i32,
    ) -> Result<Vec<SearchRecord>> {
        self.search_with_tv_id(categories, TvId::Rage(rage_id), season, episode)
            .await
    }

    pub async fn search_with_tvdb(
        &self,
        categories: &[i32],
        tvdb_id: i64,
        season: i32,
        episode: i32,
    ) -> Result<Vec<SearchRecord>> {
        self.search_with_tv_id(categories, TvId::TvDb(tvdb_id), season, episode)
            .await
    }

    pub async fn search_with_tvmaze(
        &self,
        categories: &[i32],
        tvmaze_id: i64,
        season: i32,
        episode: i32,
    ) -> Result<Vec<SearchRecord>> {
        self.search_with_tv_id(categories, TvId::TvMaze(tvmaze_id), season, episode)
            .await
    }

    pub async fn search_with_tv_id(
        &self,
        categories: &[i32],
        id: TvId,
        season: i32,
        episode: i32,
    ) -> Result<Vec<SearchRecord>> {
        let request = self.requests.tv_search(id, season, episode, categories);
        self.search(&request).await
    }

    pub async fn search_with_imdb(
        &self,
        categories: &[i32],
        imdb_id: &str,
    ) -> Result<Vec<SearchRecord>> {
        let request = self.requests.movie_search(imdb_id, categories);
        self.search(&request).await
    }

    pub async fn search_with_query(
        &self,
        categories: &[i32],
        query: &str,
        search_type: &SearchType,
    ) -> Result<Vec<SearchRecord>> {
        let request = self
            .requests
            .query_search(query, search_type, categories, None, None);
        self.search(&request).await
    }

    /// Fetch the most recent `num` RSS entries
    pub async fn load_rss_feed(&self, categories: &[i32], num: u32) -> Result<Vec<SearchRecord>> {
        let request = self.requests.rss(categories, num, None)?;
        self.search(&request).await
    }

    /// Page through the RSS listing until the record with id `marker`.
    ///
    /// Returns every record that precedes the marker, in feed order. Stops
    /// early after `max_pages` pages (0 means unbounded) or on an empty page;
    /// neither case is an error. A `page_size` of 0 is a configuration error.
    pub async fn load_rss_until_marker(
        &self,
        categories: &[i32],
        page_size: u32,
        marker: &str,
        max_pages: u32,
    ) -> Result<Vec<SearchRecord>> {
        if page_size == 0 {
            return Err(NewznabError::config("RSS page size must be at least 1"));
        }

        let mut results = Vec::new();
        let mut pages: u32 = 0;

        loop {
            let offset = u64::from(page_size) * u64::from(pages);
            let request = self.requests.rss(categories, page_size, Some(offset))?;
            let page = self.search(&request).await?;
            pages += 1;

            if let Some(position) = page.iter().position(|r| r.id == marker) {
                debug!(pages = pages, position = position, "Found RSS marker");
                results.extend(page.into_iter().take(position));
                return Ok(results);
            }

            if page.is_empty() {
                debug!(pages = pages, "RSS listing exhausted before marker");
                break;
            }
            results.extend(page);

            if max_pages != 0 && pages == max_pages {
                debug!(pages = pages, "RSS page limit reached before marker");
                break;
            }
        }

        Ok(results)
    }

    /// Fetch the comments for `record` and append them to `record.comments`.
    ///
    /// A comment whose date does not parse is kept with no date.
    pub async fn populate_comments(&self, record: &mut SearchRecord) -> Result<()> {
        let request = self.requests.comments(&record.id);
        let body = self.fetch(&request).await?;
        let feed = feed::decode_comments(&body)?;

        if let Some(error) = feed.error {
            return Err(error.into());
        }

        let fetched = feed.comments.len();
        record.comments.extend(feed.comments.into_iter().map(|raw| {
            let pub_date = match date::parse_rfc1123z(&raw.pub_date) {
                Ok(date) => Some(date),
                Err(e) => {
                    warn!(
                        guid = %record.id,
                        date_string = %raw.pub_date,
                        error = %e,
                        "Failed to parse comment date"
                    );
                    None
                }
            };
            Comment {
                title: raw.title,
                content: raw.description,
                pub_date,
            }
        }));

        debug!(guid = %record.id, comments = fetched, "Populated comments");
        Ok(())
    }

    /// URL of the `t=get` payload for `record`, including the API key
    pub fn download_url(&self, record: &SearchRecord) -> Result<Url> {
        self.requests.get(&record.id).to_url(&self.config.base_url)
    }

    /// Download the raw payload (usually an NZB) for `record`
    pub async fn download(&self, record: &SearchRecord) -> Result<Vec<u8>> {
        let url = self.download_url(record)?;
        let body = self.get(&url).await?;

        info!(guid = %record.id, size = body.len(), "Downloaded payload");
        Ok(body)
    }

    /// Fetch and decode `t=caps`
    pub async fn capabilities(&self) -> Result<Capabilities> {
        let request = self.requests.capabilities();
        let body = self.fetch(&request).await?;
        let response = feed::decode_capabilities(&body)?;

        if let Some(error) = response.error.filter(|e| e.is_error()) {
            return Err(error.into());
        }
        Ok(response.capabilities)
    }

    /// Look up a single release by GUID; `None` when the indexer has no match
    pub async fn details(&self, guid: &str) -> Result<Option<SearchRecord>> {
        let request = self.requests.details(guid);
        Ok(self.search(&request).await?.into_iter().next())
    }

    async fn fetch(&self, request: &ApiRequest) -> Result<Vec<u8>> {
        let url = request.to_url(&self.config.base_url)?;
        self.get(&url).await
    }

    /// GET `url`; a non-2xx response is an indexer error when its body is an
    /// error envelope, an HTTP status error otherwise
    async fn get(&self, url: &Url) -> Result<Vec<u8>> {
        debug!(url = %redact(url), "Requesting indexer");
        let response = self.transport.get(url).await?;

        if response.is_success() {
            return Ok(response.body);
        }

        match feed::decode_error_envelope(&response.body) {
            Some(error) => Err(error.into()),
            None => Err(NewznabError::HttpStatus {
                status: response.status,
                url: redact(url).to_string(),
            }),
        }
    }
}
