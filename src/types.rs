//! Core types for the indexer client
//!
//! These mirror the Newznab API vocabulary: a search returns a list of
//! [`SearchRecord`]s (an "NZB" in Newznab terms), each optionally carrying
//! user [`Comment`]s.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One result row from an indexer, normalized from its `newznab:attr` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Indexer GUID
    pub id: String,
    pub title: String,
    pub description: String,
    /// Size in bytes
    pub size: i64,
    pub pub_date: Option<DateTime<Utc>>,
    pub air_date: Option<DateTime<Utc>>,
    pub usenet_date: Option<DateTime<Utc>>,

    pub num_grabs: i32,
    pub num_comments: i32,
    pub rating: i32,
    pub comments: Vec<Comment>,

    /// Category codes in feed order
    pub category: Vec<String>,
    pub genre: String,
    pub info: String,
    pub resolution: String,

    // TV specific
    pub tv_db_id: String,
    pub tv_rage_id: String,
    pub tv_maze_id: String,
    pub season: String,
    pub episode: String,
    pub tv_title: String,

    // Movie specific
    pub imdb_id: String,
    pub imdb_title: String,
    pub imdb_year: i32,
    pub imdb_score: f32,
    pub cover_url: String,

    // Torznab specific
    pub seeders: i32,
    pub peers: i32,
    pub info_hash: String,
    pub is_torrent: bool,

    /// Base URL of the indexer that produced this record
    pub source_endpoint: String,
    pub source_api_key: String,
    /// Enclosure URL from the feed
    pub download_url: String,

    /// Attributes the normalizer does not recognize, kept verbatim
    pub unmatched_attrs: BTreeMap<String, String>,
}

impl SearchRecord {
    /// GUIDs are only unique per indexer, so records from several sources
    /// are keyed by endpoint and id together.
    pub fn identity_key(&self) -> (&str, &str) {
        (&self.source_endpoint, &self.id)
    }
}

/// A user comment attached to a record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub title: String,
    pub content: String,
    pub pub_date: Option<DateTime<Utc>>,
}

/// The `t=` value of a free-text search
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Search,
    TvSearch,
    Movie,
    Music,
    Book,
    /// Indexer-specific function name, sent verbatim
    Other(String),
}

impl SearchType {
    pub fn as_str(&self) -> &str {
        match self {
            SearchType::Search => "search",
            SearchType::TvSearch => "tvsearch",
            SearchType::Movie => "movie",
            SearchType::Music => "music",
            SearchType::Book => "book",
            SearchType::Other(name) => name,
        }
    }
}

impl std::fmt::Display for SearchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "search" | "q" => SearchType::Search,
            "tvsearch" | "tv-search" | "tv" => SearchType::TvSearch,
            "movie" | "movie-search" => SearchType::Movie,
            "music" | "audio" => SearchType::Music,
            "book" => SearchType::Book,
            _ => SearchType::Other(s.to_string()),
        })
    }
}

/// External identifier used by a TV search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvId {
    /// TVRage ID (legacy)
    Rage(i64),
    TvDb(i64),
    TvMaze(i64),
}

impl TvId {
    /// Query parameter carrying this id
    pub fn param(&self) -> &'static str {
        match self {
            TvId::Rage(_) => "rid",
            TvId::TvDb(_) => "tvdbid",
            TvId::TvMaze(_) => "tvmazeid",
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            TvId::Rage(id) | TvId::TvDb(id) | TvId::TvMaze(id) => *id,
        }
    }
}

/// One search mode advertised by `t=caps`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMode {
    pub available: bool,
    pub supported_params: Vec<String>,
}

impl SearchMode {
    pub fn supports(&self, param: &str) -> bool {
        self.available && self.supported_params.iter().any(|p| p == param)
    }
}

/// A category advertised by `t=caps`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsCategory {
    pub id: String,
    pub name: String,
    pub subcategories: Vec<CapsCategory>,
}

/// Capabilities document returned by `t=caps`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub server_title: Option<String>,
    pub limits_default: Option<i32>,
    pub limits_max: Option<i32>,
    pub search: SearchMode,
    pub tv_search: SearchMode,
    pub movie_search: SearchMode,
    pub audio_search: SearchMode,
    pub book_search: SearchMode,
    pub categories: Vec<CapsCategory>,
}

impl Capabilities {
    /// Find a category or subcategory by id
    pub fn category(&self, id: &str) -> Option<&CapsCategory> {
        self.categories.iter().find_map(|c| {
            if c.id == id {
                Some(c)
            } else {
                c.subcategories.iter().find(|s| s.id == id)
            }
        })
    }
}
