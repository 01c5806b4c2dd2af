//! Client library for Newznab and Torznab compatible indexers.
//!
//! Builds search requests, decodes the RSS-based response format into typed
//! [`SearchRecord`]s and offers the follow-up calls a downloader needs:
//! comments, download URL resolution and raw payload download.
//!
//! ```no_run
//! use newznab::{ClientConfig, NewznabClient, categories::cats};
//!
//! # async fn run() -> newznab::Result<()> {
//! let client = NewznabClient::new(ClientConfig::new("https://indexer.example", "apikey"))?;
//! let results = client.search_with_tvdb(&[cats::TV_HD], 75682, 10, 1).await?;
//! for record in &results {
//!     println!("{} {}", record.id, record.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod categories;
pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod normalize;
pub mod request;
pub mod transport;
pub mod types;

pub use client::NewznabClient;
pub use config::ClientConfig;
pub use error::{NewznabError, Result};
pub use request::{ApiRequest, Endpoint, RequestBuilder};
pub use transport::{HttpResponse, HttpTransport, Transport};
pub use types::{Capabilities, CapsCategory, Comment, SearchMode, SearchRecord, SearchType, TvId};
