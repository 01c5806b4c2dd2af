//! Request construction
//!
//! Every operation becomes an [`ApiRequest`]: a target endpoint plus ordered
//! query parameters. Authentication and the extended-attributes flag are
//! injected by [`RequestBuilder`] so the per-variant constructors only deal
//! with their own parameters.
//!
//! The two endpoints authenticate differently:
//!
//! - `/api?apikey=<key>&t=...`
//! - `/rss?r=<key>&i=<user id>&t=<categories>&dl=1&num=..`

use url::Url;

use crate::categories::join_codes;
use crate::error::{NewznabError, Result};
use crate::types::{SearchType, TvId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Api,
    Rss,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Api => "/api",
            Endpoint::Rss => "/rss",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Comma-joined category filter, omitted when empty
    fn categories(self, key: &str, categories: &[i32]) -> Self {
        if categories.is_empty() {
            self
        } else {
            self.param(key, join_codes(categories))
        }
    }

    /// First value of a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Resolve against an indexer base URL
    pub fn to_url(&self, base_url: &str) -> Result<Url> {
        let base = base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, self.endpoint.path()))?;
        if url.cannot_be_a_base() {
            return Err(NewznabError::config(format!("invalid base URL: {}", base_url)));
        }
        url.query_pairs_mut().extend_pairs(&self.params);
        Ok(url)
    }
}

/// Builds authenticated requests for one indexer
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    api_key: String,
    user_id: Option<i64>,
    extended: bool,
}

impl RequestBuilder {
    pub fn new(api_key: impl Into<String>, user_id: Option<i64>, extended: bool) -> Self {
        Self {
            api_key: api_key.into(),
            user_id,
            extended,
        }
    }

    /// `t=tvsearch` by rage, TheTVDB or TVMaze id
    pub fn tv_search(&self, id: TvId, season: i32, episode: i32, categories: &[i32]) -> ApiRequest {
        self.api(
            ApiRequest::new(Endpoint::Api)
                .param("t", "tvsearch")
                .param(id.param(), id.value())
                .param("season", season)
                .param("ep", episode)
                .categories("cat", categories),
        )
    }

    /// `t=movie` by IMDB id; a leading "tt" is stripped
    pub fn movie_search(&self, imdb_id: &str, categories: &[i32]) -> ApiRequest {
        self.api(
            ApiRequest::new(Endpoint::Api)
                .param("t", "movie")
                .param("imdbid", imdb_id.trim().trim_start_matches("tt"))
                .categories("cat", categories),
        )
    }

    /// Free-text search with an explicit function
    pub fn query_search(
        &self,
        query: &str,
        search_type: &SearchType,
        categories: &[i32],
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> ApiRequest {
        let mut request = ApiRequest::new(Endpoint::Api)
            .param("t", search_type)
            .param("q", query)
            .categories("cat", categories);
        if let Some(limit) = limit {
            request = request.param("limit", limit);
        }
        if let Some(offset) = offset {
            request = request.param("offset", offset);
        }
        self.api(request)
    }

    /// One page of the RSS listing
    pub fn rss(&self, categories: &[i32], num: u32, offset: Option<u64>) -> Result<ApiRequest> {
        let user_id = self
            .user_id
            .ok_or_else(|| NewznabError::config("a user id is required for RSS requests"))?;

        let mut request = ApiRequest::new(Endpoint::Rss)
            .categories("t", categories)
            .param("num", num)
            .param("dl", 1);
        if let Some(offset) = offset {
            request = request.param("offset", offset);
        }

        Ok(self.extend(request.param("r", &self.api_key).param("i", user_id)))
    }

    pub fn capabilities(&self) -> ApiRequest {
        self.api(ApiRequest::new(Endpoint::Api).param("t", "caps"))
    }

    pub fn details(&self, guid: &str) -> ApiRequest {
        self.api(ApiRequest::new(Endpoint::Api).param("t", "details").param("id", guid))
    }

    pub fn comments(&self, guid: &str) -> ApiRequest {
        self.api(ApiRequest::new(Endpoint::Api).param("t", "comments").param("id", guid))
    }

    pub fn get(&self, guid: &str) -> ApiRequest {
        self.api(ApiRequest::new(Endpoint::Api).param("t", "get").param("id", guid))
    }

    fn api(&self, request: ApiRequest) -> ApiRequest {
        self.extend(request.param("apikey", &self.api_key))
    }

    fn extend(&self, request: ApiRequest) -> ApiRequest {
        if self.extended {
            request.param("extended", 1)
        } else {
            request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::cats;
    use pretty_assertions::assert_eq;

    fn builder() -> RequestBuilder {
        RequestBuilder::new("secret", Some(42), false)
    }

    #[test]
    fn test_tv_search_variants() {
        let request = builder().tv_search(TvId::Rage(2870), 10, 1, &[cats::TV_SD]);
        assert_eq!(request.endpoint, Endpoint::Api);
        assert_eq!(request.get("t"), Some("tvsearch"));
        assert_eq!(request.get("rid"), Some("2870"));
        assert_eq!(request.get("season"), Some("10"));
        assert_eq!(request.get("ep"), Some("1"));
        assert_eq!(request.get("cat"), Some("5030"));
        assert_eq!(request.get("apikey"), Some("secret"));

        let request = builder().tv_search(TvId::TvDb(75682), 10, 1, &[]);
        assert_eq!(request.get("tvdbid"), Some("75682"));
        assert_eq!(request.get("cat"), None);

        let request = builder().tv_search(TvId::TvMaze(1), 1, 2, &[]);
        assert_eq!(request.get("tvmazeid"), Some("1"));
    }

    #[test]
    fn test_categories_joined_into_one_param() {
        let request = builder().movie_search("tt0364569", &[cats::MOVIES_HD, cats::MOVIES_BLURAY]);
        assert_eq!(request.get("imdbid"), Some("0364569"));
        assert_eq!(
            request.params.iter().filter(|(k, _)| k == "cat").count(),
            1
        );
        assert_eq!(request.get("cat"), Some("2040,2050"));
    }

    #[test]
    fn test_query_search() {
        let request = builder().query_search(
            "Supernatural S11E01",
            &SearchType::Other("tvshows".to_string()),
            &[cats::TV_HD],
            Some(100),
            None,
        );
        assert_eq!(request.get("t"), Some("tvshows"));
        assert_eq!(request.get("q"), Some("Supernatural S11E01"));
        assert_eq!(request.get("limit"), Some("100"));
        assert_eq!(request.get("offset"), None);
    }

    #[test]
    fn test_rss_auth() {
        let request = builder().rss(&[cats::TV_HD, cats::TV_SD], 50, Some(100)).unwrap();
        assert_eq!(request.endpoint, Endpoint::Rss);
        assert_eq!(request.get("t"), Some("5040,5030"));
        assert_eq!(request.get("num"), Some("50"));
        assert_eq!(request.get("dl"), Some("1"));
        assert_eq!(request.get("offset"), Some("100"));
        assert_eq!(request.get("r"), Some("secret"));
        assert_eq!(request.get("i"), Some("42"));
        assert_eq!(request.get("apikey"), None);

        let err = RequestBuilder::new("secret", None, false)
            .rss(&[], 50, None)
            .unwrap_err();
        assert!(matches!(err, NewznabError::Configuration(_)));
    }

    #[test]
    fn test_extended_flag_on_every_request() {
        let builder = RequestBuilder::new("secret", Some(1), true);
        let requests = vec![
            builder.tv_search(TvId::TvDb(1), 1, 1, &[]),
            builder.movie_search("1", &[]),
            builder.query_search("q", &SearchType::Search, &[], None, None),
            builder.rss(&[], 10, None).unwrap(),
            builder.capabilities(),
            builder.details("abc"),
            builder.comments("abc"),
            builder.get("abc"),
        ];
        for request in requests {
            assert_eq!(request.get("extended"), Some("1"), "{:?}", request);
        }

        assert_eq!(RequestBuilder::new("k", None, false).get("abc").get("extended"), None);
    }

    #[test]
    fn test_to_url() {
        let url = builder()
            .get("abc 123")
            .to_url("https://indexer.example/")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://indexer.example/api?t=get&id=abc+123&apikey=secret"
        );

        let url = builder()
            .rss(&[5040], 10, None)
            .unwrap()
            .to_url("https://indexer.example/newznab")
            .unwrap();
        assert_eq!(url.path(), "/newznab/rss");

        let err = builder().capabilities().to_url("::not a url").unwrap_err();
        assert!(matches!(err, NewznabError::Configuration(_)));
    }
}
